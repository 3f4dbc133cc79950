//! Page compositing onto the shared surface.
//!
//! The surface has a single layer, so a page goes underneath existing ink in
//! three steps: snapshot everything, draw the page over the whole raster, then
//! lay the snapshot back on top. Opaque ink wins; the page shows through
//! wherever the snapshot was transparent.

use image::imageops::{self, FilterType};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::page::PageImage;
use crate::types::{Rgba, Surface};

/// Where and how large a page lands on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Placement {
    /// Uniform scale-to-fit, centred. One axis may letterbox.
    pub fn fit(
        page_width: u32,
        page_height: u32,
        surface_width: usize,
        surface_height: usize,
    ) -> Result<Self> {
        if page_width == 0 || page_height == 0 {
            return Err(Error::PageDecode(format!(
                "page has no area ({page_width}x{page_height})"
            )));
        }
        let (sw, sh) = (surface_width as f32, surface_height as f32);
        let scale = (sw / page_width as f32).min(sh / page_height as f32);
        let scaled_w = page_width as f32 * scale;
        let scaled_h = page_height as f32 * scale;
        Ok(Self {
            scale,
            scaled_width: scaled_w.round() as u32,
            scaled_height: scaled_h.round() as u32,
            offset_x: ((sw - scaled_w) / 2.0).round() as i32,
            offset_y: ((sh - scaled_h) / 2.0).round() as i32,
        })
    }

    /// True when surface pixel (x, y) lies in the drawn page rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.offset_x
            && y >= self.offset_y
            && x < self.offset_x + self.scaled_width as i32
            && y < self.offset_y + self.scaled_height as i32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageCompositor {
    filter: FilterType,
}

impl Default for PageCompositor {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl PageCompositor {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Put `page` under the current drawing, scaled to fit the surface.
    /// On error the surface is left exactly as it was.
    pub fn composite(&self, surface: &mut Surface, page: &PageImage) -> Result<Placement> {
        let placement = Placement::fit(page.width, page.height, surface.width(), surface.height())?;
        debug!(
            page_width = page.width,
            page_height = page.height,
            scale = placement.scale,
            offset_x = placement.offset_x,
            offset_y = placement.offset_y,
            "page placement"
        );

        let snapshot = surface.snapshot();
        if let Err(e) = self.draw_page(surface, page, &placement) {
            surface.restore(&snapshot);
            return Err(e);
        }
        surface.overlay(&snapshot);

        info!(
            width = placement.scaled_width,
            height = placement.scaled_height,
            "page composited"
        );
        Ok(placement)
    }

    /// Whole-surface render: everything is cleared, then the resampled page is copied in.
    fn draw_page(
        &self,
        surface: &mut Surface,
        page: &PageImage,
        placement: &Placement,
    ) -> Result<()> {
        let src = page.to_rgba_image()?;
        if placement.scaled_width == 0 || placement.scaled_height == 0 {
            // Page too thin to cover a single pixel at this scale.
            surface.clear();
            return Ok(());
        }
        let scaled = if (placement.scaled_width, placement.scaled_height) == src.dimensions() {
            src
        } else {
            imageops::resize(&src, placement.scaled_width, placement.scaled_height, self.filter)
        };

        surface.clear();
        for (x, y, px) in scaled.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            surface.put(
                placement.offset_x + x as i32,
                placement.offset_y + y as i32,
                Rgba::new(r, g, b, a),
            );
        }
        Ok(())
    }
}
