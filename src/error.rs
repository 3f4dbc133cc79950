// One error type for the whole crate.
// Page variants are the only ones the engine raises at runtime; the rest reject
// bad values at the boundary (CLI, UI wiring) before they reach the surface.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The page bytes (or a hand-built page buffer) could not be turned into pixels.
    #[error("Page decode error: {0}")]
    PageDecode(String),

    /// The page source could not be read.
    #[error("Page load error: {path:?}: {source}")]
    PageLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid stroke width: {0} (must be finite and > 0)")]
    InvalidWidth(f32),

    #[error("Invalid color: {0:?} (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    #[error("Invalid mode: {0:?} (expected \"draw\" or \"erase\")")]
    InvalidMode(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),
}

impl Error {
    /// True for the failures a user should be told about after picking a page.
    pub fn is_page_error(&self) -> bool {
        matches!(self, Error::PageDecode(_) | Error::PageLoad { .. })
    }
}
