//! Page decoding and loading.
//!
//! Turning page bytes into pixels is delegated to a [`PageDecoder`].
//! [`RasterPageDecoder`] handles whatever raster formats the `image` crate was
//! built with, [`PdfPageDecoder`] renders the first page of a PDF, and
//! [`AnyPageDecoder`] picks between them by sniffing the bytes. [`spawn_load`]
//! reads and decodes on a worker thread so the input loop keeps painting while
//! a page is on its way.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use hayro::{InterpreterSettings, Pdf, RenderSettings};
use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::Rgba;

/// PDF files announce themselves with this marker near the start.
const PDF_MAGIC: &[u8] = b"%PDF-";
/// How far into the file the marker may appear (leading junk is tolerated).
const PDF_SNIFF_WINDOW: usize = 1024;

/// Byte length of a `width` x `height` RGBA buffer, computed without `u32` overflow.
pub fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// A decoded page. Transient: composited once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel, row-major).
    pub data: Vec<u8>,
}

impl PageImage {
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Solid page, mostly useful as a stand-in sheet.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        let data = [color.r, color.g, color.b, color.a].repeat(rgba_len(width, height) / 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// View as an `image` buffer. Fails when `data` does not match the dimensions.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            Error::PageDecode(format!(
                "page buffer holds {} bytes, {}x{} RGBA needs {}",
                self.data.len(),
                self.width,
                self.height,
                rgba_len(self.width, self.height)
            ))
        })
    }
}

/// Turns raw page bytes into a [`PageImage`].
pub trait PageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PageImage>;
}

/// Composite every pixel over opaque `paper` so the page has no see-through holes.
fn flatten_onto(mut rgba: RgbaImage, paper: Rgba) -> Result<PageImage> {
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::PageDecode("page has no pixels".into()));
    }

    let paper = Rgba { a: 255, ..paper };
    for px in rgba.pixels_mut() {
        let [r, g, b, a] = px.0;
        let flat = Rgba::new(r, g, b, a).over(paper);
        px.0 = [flat.r, flat.g, flat.b, flat.a];
    }
    debug!(width = w, height = h, "page decoded");
    Ok(PageImage::from_rgba_image(rgba))
}

/// Decodes raster page images and flattens them onto an opaque sheet,
/// the way a document renderer paints a page over white paper.
#[derive(Debug, Clone, Copy)]
pub struct RasterPageDecoder {
    pub paper: Rgba,
}

impl Default for RasterPageDecoder {
    fn default() -> Self {
        Self { paper: Rgba::WHITE }
    }
}

impl PageDecoder for RasterPageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PageImage> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::PageDecode(format!("Failed to decode page: {e}")))?;
        flatten_onto(img.to_rgba8(), self.paper)
    }
}

/// Renders the first page of a PDF document.
///
/// At `scale` 1.0 one PDF point becomes one pixel, so the page keeps its
/// intrinsic size and the compositor does the fitting.
#[derive(Debug, Clone, Copy)]
pub struct PdfPageDecoder {
    pub scale: f32,
    pub paper: Rgba,
}

impl Default for PdfPageDecoder {
    fn default() -> Self {
        Self {
            scale: 1.0,
            paper: Rgba::WHITE,
        }
    }
}

impl PageDecoder for PdfPageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PageImage> {
        let pdf = Pdf::new(Arc::new(bytes.to_vec()))
            .map_err(|e| Error::PageDecode(format!("Failed to open PDF: {e:?}")))?;
        let pages = pdf.pages();
        let page = pages
            .iter()
            .next()
            .ok_or_else(|| Error::PageDecode("PDF has no pages".into()))?;

        let render_settings = RenderSettings {
            x_scale: self.scale,
            y_scale: self.scale,
            ..Default::default()
        };
        let pixmap = hayro::render(page, &InterpreterSettings::default(), &render_settings);

        // The pixmap's PNG form is straight-alpha RGBA, which is what the surface speaks.
        let img = image::load_from_memory(&pixmap.take_png())
            .map_err(|e| Error::PageDecode(format!("Failed to read rendered PDF page: {e}")))?;
        flatten_onto(img.to_rgba8(), self.paper)
    }
}

/// True when `bytes` look like a PDF document.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(PDF_SNIFF_WINDOW)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Sends PDFs to [`PdfPageDecoder`] and everything else to [`RasterPageDecoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPageDecoder {
    pub raster: RasterPageDecoder,
    pub pdf: PdfPageDecoder,
}

impl PageDecoder for AnyPageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PageImage> {
        if is_pdf(bytes) {
            self.pdf.decode(bytes)
        } else {
            self.raster.decode(bytes)
        }
    }
}

/// Read `path` and decode it. Nothing is touched on failure.
pub fn load_page(path: &Path, decoder: &impl PageDecoder) -> Result<PageImage> {
    let bytes = fs::read(path).map_err(|source| Error::PageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    decoder.decode(&bytes)
}

/// A page being read and decoded on a worker thread.
pub struct PendingPage {
    path: PathBuf,
    rx: Option<Receiver<Result<PageImage>>>,
}

impl PendingPage {
    /// File this load is reading.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check. Yields the result exactly once, then `None` forever.
    pub fn poll(&mut self) -> Option<Result<PageImage>> {
        let rx = self.rx.as_ref()?;
        let out = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(self.worker_gone()),
        };
        self.rx = None;
        Some(out)
    }

    /// Block until the worker is done.
    pub fn wait(mut self) -> Result<PageImage> {
        match self.rx.take() {
            Some(rx) => rx.recv().unwrap_or_else(|_| Err(self.worker_gone())),
            None => Err(self.worker_gone()),
        }
    }

    fn worker_gone(&self) -> Error {
        Error::PageLoad {
            path: self.path.clone(),
            source: io::Error::other("page loader exited without a result"),
        }
    }
}

/// Start reading and decoding `path` off the calling thread.
pub fn spawn_load<D>(path: impl Into<PathBuf>, decoder: D) -> Result<PendingPage>
where
    D: PageDecoder + Send + 'static,
{
    let path = path.into();
    let (tx, rx) = mpsc::channel();
    let worker_path = path.clone();
    thread::Builder::new()
        .name("page-loader".into())
        .spawn(move || {
            let result = load_page(&worker_path, &decoder);
            if let Err(e) = &result {
                warn!(error = %e, "page load failed");
            }
            // Receiver gone means nobody wants the page any more.
            let _ = tx.send(result);
        })
        .map_err(|source| Error::PageLoad {
            path: path.clone(),
            source,
        })?;
    Ok(PendingPage { path, rx: Some(rx) })
}
