//! The drawing surface as its collaborators see it.
//!
//! [`Whiteboard`] owns the raster and hands it to the stroke engine and the
//! page compositor in turn. Both run on the caller's thread, so each operation
//! has the surface to itself.

use tracing::{debug, warn};

use crate::compositor::{PageCompositor, Placement};
use crate::error::Result;
use crate::page::{AnyPageDecoder, PageDecoder, PageImage};
use crate::stroke::StrokeEngine;
use crate::types::{Mode, Point, Rgba, StrokeStyle, StrokeWidth, Surface};

/// A drawing surface with its pen and page pipeline.
///
/// `D` turns page bytes into pixels; the default accepts raster images and PDFs.
pub struct Whiteboard<D = AnyPageDecoder> {
    surface: Surface,
    engine: StrokeEngine,
    compositor: PageCompositor,
    decoder: D,
}

impl Whiteboard<AnyPageDecoder> {
    /// Blank transparent board with the default pen (2px black, draw mode).
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_decoder(width, height, AnyPageDecoder::default())
    }
}

impl<D: PageDecoder> Whiteboard<D> {
    /// Blank board that decodes pages with `decoder`.
    pub fn with_decoder(width: usize, height: usize, decoder: D) -> Self {
        Self {
            surface: Surface::new(width, height),
            engine: StrokeEngine::default(),
            compositor: PageCompositor::default(),
            decoder,
        }
    }

    /// Replace the pen. Only valid before the first stroke starts.
    pub fn with_pen(mut self, mode: Mode, style: StrokeStyle) -> Self {
        self.engine = StrokeEngine::new(mode, style);
        self
    }

    /// Use `compositor` (e.g. a different resampling filter) for later composites.
    pub fn with_compositor(mut self, compositor: PageCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Current pixels.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Stroke state, mainly to ask whether a stroke is in progress.
    pub fn engine(&self) -> &StrokeEngine {
        &self.engine
    }

    /// Mode the next stroke will start in.
    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn style(&self) -> StrokeStyle {
        self.engine.style()
    }

    /// Start a stroke at `(x, y)`. Draw mode leaves a dot even if the pointer never moves.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.engine.pointer_down(&mut self.surface, Point::new(x, y));
    }

    /// Extend the active stroke to `(x, y)`; ignored while idle.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.engine.pointer_move(&mut self.surface, Point::new(x, y));
    }

    /// End the stroke. Nothing is painted.
    pub fn pointer_up(&mut self) {
        self.engine.pointer_up();
    }

    /// Same as [`Self::pointer_up`]: leaving the surface ends the stroke.
    pub fn pointer_leave(&mut self) {
        self.engine.pointer_leave();
    }

    /// Flip between draw and erase, returning the new mode.
    /// A stroke in progress keeps the mode it started with.
    pub fn toggle_erase_mode(&mut self) -> Mode {
        self.engine.toggle_erase_mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.engine.set_mode(mode);
    }

    /// Colour for draw segments from here on; already painted pixels keep theirs.
    pub fn set_color(&mut self, color: Rgba) {
        self.engine.set_color(color);
    }

    /// Rejects zero, negative and non-finite widths; the pen keeps its old width then.
    pub fn set_width(&mut self, px: f32) -> Result<()> {
        let width = StrokeWidth::new(px)?;
        self.engine.set_width(width);
        Ok(())
    }

    /// Every pixel back to transparent.
    pub fn clear_surface(&mut self) {
        debug!("surface cleared");
        self.surface.clear();
    }

    /// Decode `bytes` as a page and composite it under the drawing.
    /// Decoding finishes before the surface is touched; any failure leaves it unchanged.
    pub fn composite(&mut self, bytes: &[u8]) -> Result<Placement> {
        let page = self.decoder.decode(bytes).inspect_err(|e| {
            warn!(error = %e, "page rejected");
        })?;
        self.composite_page(&page)
    }

    /// Composite an already decoded page, e.g. one delivered by a `PendingPage`.
    pub fn composite_page(&mut self, page: &PageImage) -> Result<Placement> {
        self.compositor.composite(&mut self.surface, page)
    }

    /// Surface flattened over `background`, packed 0x00RRGGBB.
    pub fn frame(&self, background: Rgba) -> Vec<u32> {
        self.surface.to_frame(background)
    }
}
