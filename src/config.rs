// Runtime settings for the window binary.
// Every flag can also come from an INK_BOARD_* environment variable.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::imageops::FilterType;

use crate::types::{Mode, Rgba, StrokeStyle, StrokeWidth};

#[derive(Debug, Clone, Parser)]
#[command(name = "ink-board", version, about = "Freehand drawing surface with a page underlay")]
pub struct Config {
    /// Surface width in pixels
    #[arg(long, env = "INK_BOARD_WIDTH", default_value_t = 800)]
    pub width: usize,

    /// Surface height in pixels
    #[arg(long, env = "INK_BOARD_HEIGHT", default_value_t = 600)]
    pub height: usize,

    /// Pen colour, #rrggbb or #rrggbbaa
    #[arg(long, env = "INK_BOARD_COLOR", default_value = "#000000")]
    pub color: Rgba,

    /// Pen width in pixels
    #[arg(long, env = "INK_BOARD_LINE_WIDTH", default_value = "2")]
    pub line_width: StrokeWidth,

    /// Starting mode: draw or erase
    #[arg(long, env = "INK_BOARD_MODE", default_value = "draw")]
    pub mode: Mode,

    /// Resampling filter used to fit the page to the surface
    #[arg(long, env = "INK_BOARD_FILTER", value_enum, default_value_t = ResampleFilter::Triangle)]
    pub filter: ResampleFilter,

    /// Page image or PDF to put under the drawing at startup (P reloads it)
    #[arg(long, env = "INK_BOARD_PAGE")]
    pub page: Option<PathBuf>,

    /// Verbose logging; RUST_LOG is honoured when set
    #[arg(long, env = "INK_BOARD_DEBUG")]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Config {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            width: self.line_width,
        }
    }
}
