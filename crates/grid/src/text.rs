//! Cell label rasterization.
//!
//! Labels are drawn with an `ab_glyph` outline font. The font is loaded from
//! an explicit path when configured, otherwise resolved through the system
//! font database (`font-kit`) from [`LABEL_FONT_FAMILIES`]. Without any
//! font, callers skip labels.

use std::fmt;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use font_kit::family_name::FamilyName;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use image::RgbaImage;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::raster::blend_pixel;

/// Label text size, in pixels.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Families tried, in order, when no label font is configured. The generic
/// sans-serif family is always appended.
pub const LABEL_FONT_FAMILIES: &[&str] = &["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans"];

/// A parsed outline font, drawn at [`LABEL_FONT_SIZE`].
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont").finish_non_exhaustive()
    }
}

impl LabelFont {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, GridError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| GridError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> Result<Self, GridError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Best system match for [`LABEL_FONT_FAMILIES`] at regular weight.
    pub fn from_system() -> Result<Self, GridError> {
        let families: Vec<FamilyName> = LABEL_FONT_FAMILIES
            .iter()
            .map(|name| FamilyName::Title((*name).to_string()))
            .chain(std::iter::once(FamilyName::SansSerif))
            .collect();

        let handle = SystemSource::new()
            .select_best_match(&families, &Properties::new())
            .map_err(|e| GridError::Font(format!("no system sans-serif font: {e}")))?;
        let loaded = handle
            .load()
            .map_err(|e| GridError::Font(format!("failed to load system font: {e}")))?;
        let name = loaded.full_name();
        let data = loaded
            .copy_font_data()
            .ok_or_else(|| GridError::Font(format!("no font data for {name}")))?;

        let font = Self::from_bytes((*data).clone())?;
        tracing::debug!(font = %name, "Loaded system label font");
        Ok(font)
    }

    /// Resolve the label font for `config`.
    ///
    /// A configured path that cannot be loaded is an error; a failed system
    /// lookup is not, and yields `None`.
    pub fn discover(config: &GridConfig) -> Result<Option<Self>, GridError> {
        if let Some(path) = &config.label_font {
            return Self::from_path(path).map(Some);
        }
        match Self::from_system() {
            Ok(font) => Ok(Some(font)),
            Err(e) => {
                tracing::warn!(error = %e, "No label font found; cell labels will not be drawn");
                Ok(None)
            }
        }
    }

    /// Horizontal advance of `text`, including kerning.
    pub fn text_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(LABEL_FONT_SIZE);
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Draw `text` left-aligned at `x` with the bottom of its line box on
    /// `bottom`, blended at `opacity`.
    pub fn draw_text(
        &self,
        image: &mut RgbaImage,
        text: &str,
        x: f32,
        bottom: f32,
        rgb: [u8; 3],
        opacity: f32,
    ) {
        let scale = PxScale::from(LABEL_FONT_SIZE);
        let scaled = self.font.as_scaled(scale);
        // descent is negative; the baseline sits above the box bottom.
        let baseline = bottom + scaled.descent();
        let (width, height) = image.dimensions();

        let mut cursor = x;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(cursor, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + i64::from(gx);
                    let py = bounds.min.y as i64 + i64::from(gy);
                    if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                        return;
                    }
                    blend_pixel(
                        image.get_pixel_mut(px as u32, py as u32),
                        rgb,
                        coverage * opacity,
                    );
                });
            }
            cursor += scaled.h_advance(id);
            previous = Some(id);
        }
    }
}
