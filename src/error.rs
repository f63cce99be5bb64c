// ============================================================================
// ERRORS
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges of the watch face: asset loading and the
/// desktop host. The engine callbacks themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("font data could not be parsed")]
    InvalidFont,

    #[error("failed to read font file {path}: {source}")]
    FontFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read image file {path}: {source}")]
    ImageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image could not be decoded: {0}")]
    Png(#[from] png::DecodingError),

    #[error("unsupported image layout: {0:?}")]
    UnsupportedImage(png::ColorType),

    #[error("bitmap buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BitmapSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
