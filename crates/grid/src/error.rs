use atelier_core::error::CoreError;

/// Errors from loading, rendering, or exporting a grid image.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A domain-level error from `atelier_core` (limits, lookups).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or encoding the raster failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The label font could not be parsed.
    #[error("Invalid font: {0}")]
    Font(String),

    /// The source image has no pixels.
    #[error("Source image is empty")]
    EmptySource,
}
