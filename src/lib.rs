//! Freehand ink and eraser strokes on an RGBA raster, plus a page underlay
//! that is composited beneath whatever has already been drawn.

pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod logging;
pub mod page;
pub mod stroke;
pub mod types;
pub mod whiteboard;
pub mod window;

pub use compositor::{PageCompositor, Placement};
pub use error::{Error, Result};
pub use page::{
    AnyPageDecoder, PageDecoder, PageImage, PdfPageDecoder, PendingPage, RasterPageDecoder, is_pdf,
    spawn_load,
};
pub use stroke::{StrokeEngine, StrokeState};
pub use types::{Mode, Point, Rgba, StrokeStyle, StrokeWidth, Surface};
pub use whiteboard::Whiteboard;
