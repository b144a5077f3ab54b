//! The render pass: source + settings + paper + grayscale flag → composite.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use atelier_core::grid::{exceeds_single_letter_rows, GridSettings};
use atelier_core::paper::PaperFormat;
use atelier_core::printing::PrintingGuide;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::layout::{canvas_size, grid_lines, label_placements, CanvasSize};
use crate::raster::{apply_grayscale, stroke_line};
use crate::source::SourceImage;
use crate::text::LabelFont;

/// File name used when the composite is downloaded.
pub const GRID_EXPORT_FILE_NAME: &str = "grid-image.png";

/// Result of one render pass.
#[derive(Debug, Clone)]
pub struct GridRender {
    pub image: RgbaImage,
    pub size: CanvasSize,
    pub printing_guide: PrintingGuide,
}

impl GridRender {
    /// Lossless PNG encoding of the composite.
    pub fn encode_png(&self) -> Result<Vec<u8>, GridError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Write the composite to `dir/grid-image.png`, returning the path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, GridError> {
        let path = dir.join(GRID_EXPORT_FILE_NAME);
        std::fs::write(&path, self.encode_png()?)?;
        tracing::info!(path = %path.display(), "Saved grid image");
        Ok(path)
    }
}

/// Renders grid composites. Holds only the optional label font, so one
/// renderer can serve any number of sources.
#[derive(Debug, Clone, Default)]
pub struct GridRenderer {
    font: Option<LabelFont>,
}

impl GridRenderer {
    pub fn new(font: Option<LabelFont>) -> Self {
        Self { font }
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        Ok(Self::new(LabelFont::discover(config)?))
    }

    pub fn has_label_font(&self) -> bool {
        self.font.is_some()
    }

    /// Compose the grid overlay.
    ///
    /// Always starts from `source`; the result depends only on the
    /// arguments. Out-of-range settings are clamped and an unparseable
    /// line colour falls back to black.
    pub fn render(
        &self,
        source: &SourceImage,
        settings: &GridSettings,
        paper: &PaperFormat,
        grayscale: bool,
    ) -> GridRender {
        let settings = settings.clone().clamped();
        let size = canvas_size(source.width(), source.height(), &settings);

        let mut image = if (source.width(), source.height()) == (size.width, size.height) {
            source.pixels().clone()
        } else {
            imageops::resize(source.pixels(), size.width, size.height, FilterType::Triangle)
        };

        if grayscale {
            apply_grayscale(&mut image);
        }

        let rgb = settings.line_rgb().unwrap_or_else(|e| {
            tracing::warn!(color = %settings.line_color, error = %e, "Falling back to black grid lines");
            [0, 0, 0]
        });

        for line in grid_lines(size, &settings) {
            stroke_line(&mut image, &line, settings.line_width, rgb, settings.line_opacity);
        }

        if settings.show_labels {
            if exceeds_single_letter_rows(settings.rows) {
                tracing::warn!(
                    rows = settings.rows,
                    "Row labels past 'Z' leave the A-Z range"
                );
            }
            if let Some(font) = &self.font {
                for label in label_placements(size, &settings) {
                    font.draw_text(
                        &mut image,
                        &label.text,
                        label.x,
                        label.y,
                        rgb,
                        settings.line_opacity,
                    );
                }
            }
        }

        tracing::debug!(
            width = size.width,
            height = size.height,
            rows = settings.rows,
            columns = settings.columns,
            grayscale,
            "Rendered grid",
        );

        GridRender {
            image,
            size,
            printing_guide: PrintingGuide::compute(&settings, paper),
        }
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::paper::find_paper_format;
    use image::Rgba;

    use super::*;

    fn source(width: u32, height: u32) -> SourceImage {
        SourceImage::from_rgba(RgbaImage::from_pixel(width, height, Rgba([200, 180, 40, 255])))
            .unwrap()
    }

    #[test]
    fn wide_source_is_downscaled() {
        let render = GridRenderer::default().render(
            &source(2000, 1000),
            &GridSettings::default(),
            &find_paper_format("A4").unwrap(),
            false,
        );
        assert_eq!(render.size, CanvasSize { width: 1600, height: 800 });
        assert_eq!(render.image.dimensions(), (1600, 800));
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let settings = GridSettings {
            rows: 0,
            columns: 500,
            line_width: 0.0,
            ..Default::default()
        };
        let render = GridRenderer::default().render(
            &source(100, 100),
            &settings,
            &find_paper_format("A4").unwrap(),
            false,
        );
        assert_eq!(render.printing_guide.horizontal_count, 1);
        assert_eq!(render.printing_guide.vertical_count, 49);
    }

    #[test]
    fn invalid_colour_draws_black() {
        let settings = GridSettings {
            rows: 2,
            columns: 2,
            line_color: "not-a-colour".into(),
            line_opacity: 1.0,
            line_width: 2.0,
            show_labels: false,
            ..Default::default()
        };
        let render = GridRenderer::default().render(
            &source(10, 10),
            &settings,
            &find_paper_format("A4").unwrap(),
            false,
        );
        assert_eq!(render.image.get_pixel(5, 0).0, [0, 0, 0, 255]);
        assert_eq!(render.image.get_pixel(0, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn save_writes_fixed_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let render = GridRenderer::default().render(
            &source(20, 10),
            &GridSettings::default(),
            &find_paper_format("Letter").unwrap(),
            true,
        );
        let path = render.save(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), GRID_EXPORT_FILE_NAME);

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded, render.image);
    }
}
