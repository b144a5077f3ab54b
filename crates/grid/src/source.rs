//! Source image loading.
//!
//! A [`SourceImage`] is decoded once and never mutated; every render
//! resamples from it.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use atelier_core::upload::validate_upload_size;
use image::{DynamicImage, ImageReader, RgbaImage};

use crate::error::GridError;

/// Decoded, immutable source raster. Cloning shares the pixels.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, GridError> {
        let pixels = image.into_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(GridError::EmptySource);
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, GridError> {
        Self::from_dynamic(DynamicImage::ImageRgba8(pixels))
    }

    /// Decode an encoded image held in memory, enforcing the upload limit.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GridError> {
        validate_upload_size(bytes.len() as u64)?;
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Self::from_dynamic(image)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Load and decode an image file.
///
/// The size limit is checked from file metadata before any decoding.
pub fn load_source(path: &Path) -> Result<SourceImage, GridError> {
    let size = std::fs::metadata(path)?.len();
    validate_upload_size(size)?;

    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let source = SourceImage::from_dynamic(image)?;
    tracing::debug!(
        path = %path.display(),
        width = source.width(),
        height = source.height(),
        "Loaded source image",
    );
    Ok(source)
}
