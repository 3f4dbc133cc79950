// Core value types shared by the stroke engine and the page compositor.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One straight-alpha RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || Error::InvalidColor(s.to_string());
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// `self` composited over `dst` (Porter-Duff source-over, straight alpha).
    /// Exact when either side is fully transparent or `self` is opaque.
    pub fn over(self, dst: Rgba) -> Rgba {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = self.a as u32;
        let inv = 255 - sa;
        let da = dst.a as u32 * inv; // scaled by 255
        let out_a = sa * 255 + da; // scaled by 255*255
        let mix = |s: u8, d: u8| -> u8 {
            let num = s as u32 * sa * 255 + d as u32 * da;
            ((num + out_a / 2) / out_a) as u8
        };
        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: ((out_a + 127) / 255) as u8,
        }
    }

    /// Pack as 0x00RRGGBB for the window (alpha dropped).
    #[inline]
    pub fn to_xrgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgba::from_hex(s)
    }
}

/// A position in surface-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// What a stroke does to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Draw,
    Erase,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Draw => Mode::Erase,
            Mode::Erase => Mode::Draw,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Draw => f.write_str("draw"),
            Mode::Erase => f.write_str("erase"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draw" => Ok(Mode::Draw),
            "erase" => Ok(Mode::Erase),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// Line width in pixels. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct StrokeWidth(f32);

impl StrokeWidth {
    pub const DEFAULT: StrokeWidth = StrokeWidth(2.0);

    pub fn new(px: f32) -> Result<Self> {
        if px.is_finite() && px > 0.0 {
            Ok(Self(px))
        } else {
            Err(Error::InvalidWidth(px))
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for StrokeWidth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let px: f32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidWidth(f32::NAN))?;
        StrokeWidth::new(px)
    }
}

/// Paint parameters handed to every paint call; never stored on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: StrokeWidth,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: StrokeWidth::DEFAULT,
        }
    }
}

/// Fixed-size RGBA raster. Starts fully transparent.
/// Every write outside the raster is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>, // row-major, len = width * height
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite one pixel.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over one pixel.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Destination-out with an opaque source: the pixel becomes transparent.
    #[inline]
    pub fn erase(&mut self, x: i32, y: i32) {
        self.put(x, y, Rgba::TRANSPARENT);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    /// Full copy of the current content.
    pub fn snapshot(&self) -> Surface {
        self.clone()
    }

    /// Put a snapshot back verbatim. Sizes must match; a mismatched snapshot is ignored.
    pub fn restore(&mut self, snapshot: &Surface) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixels.copy_from_slice(&snapshot.pixels);
        }
    }

    /// Composite a snapshot source-over on top of the current content.
    /// Transparent snapshot pixels let the current content show through.
    pub fn overlay(&mut self, snapshot: &Surface) {
        if snapshot.width != self.width || snapshot.height != self.height {
            return;
        }
        for (dst, src) in self.pixels.iter_mut().zip(&snapshot.pixels) {
            *dst = src.over(*dst);
        }
    }

    /// Flatten onto an opaque background as 0x00RRGGBB, ready for the window.
    pub fn to_frame(&self, background: Rgba) -> Vec<u32> {
        let bg = Rgba { a: 255, ..background };
        self.pixels.iter().map(|p| p.over(bg).to_xrgb()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(Rgba::from_hex("#000000").unwrap(), Rgba::BLACK);
        assert_eq!(Rgba::from_hex("ff8000").unwrap(), Rgba::opaque(255, 128, 0));
        assert_eq!(
            Rgba::from_hex("#11223380").unwrap(),
            Rgba::new(0x11, 0x22, 0x33, 0x80)
        );
        assert!(Rgba::from_hex("#12345").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
        assert!(Rgba::from_hex("#ééé").is_err());
        assert!(Rgba::from_hex("#+f0000").is_err());
    }

    #[test]
    fn test_over_exact_cases() {
        let red = Rgba::opaque(255, 0, 0);
        let ghost = Rgba::new(10, 20, 30, 0);
        assert_eq!(red.over(Rgba::WHITE), red);
        assert_eq!(ghost.over(red), red);
        let half = Rgba::new(0, 0, 255, 128);
        assert_eq!(half.over(Rgba::TRANSPARENT), half);
    }

    #[test]
    fn test_over_half_alpha_on_opaque() {
        let half_black = Rgba::new(0, 0, 0, 128);
        let out = half_black.over(Rgba::WHITE);
        assert_eq!(out.a, 255);
        assert!((126..=128).contains(&out.r), "got {out:?}");
        assert_eq!(out.r, out.g);
        assert_eq!(out.g, out.b);
    }

    #[test]
    fn test_mode_parse_and_toggle() {
        assert_eq!("draw".parse::<Mode>().unwrap(), Mode::Draw);
        assert_eq!("ERASE".parse::<Mode>().unwrap(), Mode::Erase);
        assert!("smudge".parse::<Mode>().is_err());
        assert_eq!(Mode::Draw.toggled().toggled(), Mode::Draw);
    }

    #[test]
    fn test_stroke_width_rejects_bad_values() {
        assert!(StrokeWidth::new(0.0).is_err());
        assert!(StrokeWidth::new(-3.0).is_err());
        assert!(StrokeWidth::new(f32::NAN).is_err());
        assert!(StrokeWidth::new(f32::INFINITY).is_err());
        assert_eq!(StrokeWidth::new(4.0).unwrap().get(), 4.0);
        assert!("abc".parse::<StrokeWidth>().is_err());
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut s = Surface::new(4, 3);
        s.put(-1, 0, Rgba::BLACK);
        s.put(4, 0, Rgba::BLACK);
        s.blend(0, 3, Rgba::BLACK);
        s.erase(100, 100);
        assert!(s.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
        assert_eq!(s.get(-1, 0), None);
    }

    #[test]
    fn test_overlay_keeps_ink_and_shows_through_gaps() {
        let mut snap = Surface::new(2, 1);
        snap.put(0, 0, Rgba::BLACK);
        let mut s = Surface::new(2, 1);
        s.put(0, 0, Rgba::WHITE);
        s.put(1, 0, Rgba::WHITE);
        s.overlay(&snap);
        assert_eq!(s.get(0, 0), Some(Rgba::BLACK));
        assert_eq!(s.get(1, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_to_frame_flattens_on_background() {
        let mut s = Surface::new(2, 1);
        s.put(1, 0, Rgba::opaque(0x12, 0x34, 0x56));
        assert_eq!(s.to_frame(Rgba::WHITE), vec![0x00FF_FFFF, 0x0012_3456]);
    }
}
