//! Integration tests for the grid render pass.
//!
//! Exercises the full pipeline (resample, grayscale, lines, printing guide)
//! through the public API only.

use atelier_core::grid::{GridSettings, GridType};
use atelier_core::paper::find_paper_format;
use atelier_grid::layout::CanvasSize;
use atelier_grid::{GridRenderer, SourceImage};
use image::{Rgba, RgbaImage};

fn gradient(width: u32, height: u32) -> SourceImage {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    SourceImage::from_rgba(pixels).expect("non-empty source")
}

fn plain_settings(rows: u32, columns: u32) -> GridSettings {
    GridSettings {
        rows,
        columns,
        line_color: "#ff0000".into(),
        line_opacity: 1.0,
        line_width: 1.0,
        show_labels: false,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: grayscale is recomputed from the source
// ---------------------------------------------------------------------------

/// Rendering gray and then colour again reproduces the first colour render
/// bit for bit.
#[test]
fn grayscale_on_then_off_is_bit_identical() {
    let renderer = GridRenderer::default();
    let source = gradient(300, 200);
    let settings = GridSettings::default();
    let paper = find_paper_format("A4").unwrap();

    let colour = renderer.render(&source, &settings, &paper, false);
    let gray = renderer.render(&source, &settings, &paper, true);
    let colour_again = renderer.render(&source, &settings, &paper, false);

    assert_ne!(gray.image, colour.image);
    assert_eq!(colour_again.image, colour.image);
    assert_eq!(colour.encode_png().unwrap(), colour_again.encode_png().unwrap());
}

/// Gray output has equal channels everywhere (lines are drawn after the
/// transform, so only untouched pixels are checked).
#[test]
fn grayscale_pixels_have_equal_channels() {
    let renderer = GridRenderer::default();
    let source = SourceImage::from_rgba(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]))).unwrap();
    let settings = GridSettings {
        rows: 2,
        columns: 2,
        show_labels: false,
        ..Default::default()
    };
    let render = renderer.render(&source, &settings, &find_paper_format("A4").unwrap(), true);
    assert_eq!(render.image.get_pixel(0, 0).0, [20, 20, 20, 255]);
}

// ---------------------------------------------------------------------------
// Test: grid lines land where expected
// ---------------------------------------------------------------------------

/// A 1px red line on a pixel boundary tints the two columns either side of
/// it and leaves the rest of the source alone.
#[test]
fn vertical_lines_tint_boundary_columns() {
    let renderer = GridRenderer::default();
    let source = SourceImage::from_rgba(RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255])))
        .unwrap();
    let render = renderer.render(
        &source,
        &plain_settings(3, 4),
        &find_paper_format("A4").unwrap(),
        false,
    );

    for x in [99, 100, 199, 200, 299, 300] {
        assert_eq!(render.image.get_pixel(x, 50).0, [255, 128, 128, 255], "x = {x}");
    }
    for x in [50, 98, 101, 150] {
        assert_eq!(render.image.get_pixel(x, 50).0, [255, 255, 255, 255], "x = {x}");
    }
}

/// Square cells with fit enabled force the canvas to `columns / rows`.
#[test]
fn square_fit_forces_cell_aspect() {
    let renderer = GridRenderer::default();
    let settings = GridSettings {
        grid_type: GridType::Square,
        adjust_image_to_fit: true,
        show_labels: false,
        ..plain_settings(5, 10)
    };
    let render = renderer.render(&gradient(1000, 1000), &settings, &find_paper_format("A3").unwrap(), false);
    assert_eq!(render.size, CanvasSize { width: 1000, height: 500 });
}

// ---------------------------------------------------------------------------
// Test: printing guide end to end
// ---------------------------------------------------------------------------

/// 6x4 on A4 ends at F4 with 52.5 mm column spacing.
#[test]
fn a4_six_by_four_guide() {
    let renderer = GridRenderer::default();
    let settings = GridSettings {
        rows: 6,
        columns: 4,
        ..Default::default()
    };
    let render = renderer.render(&gradient(120, 90), &settings, &find_paper_format("A4").unwrap(), false);
    let guide = &render.printing_guide;

    assert_eq!(guide.last_label, "F4");
    assert_eq!(guide.vertical_count, 3);
    assert_eq!(guide.horizontal_count, 5);
    assert_eq!(guide.vertical_interval, "52.5");
    assert_eq!(guide.horizontal_interval, "49.5");
}

/// An unfilled custom paper size renders fine and reports zero spacing.
#[test]
fn unfilled_custom_paper_is_tolerated() {
    let renderer = GridRenderer::default();
    let render = renderer.render(
        &gradient(50, 50),
        &GridSettings::default(),
        &find_paper_format("Custom").unwrap(),
        false,
    );
    assert_eq!(render.printing_guide.vertical_interval, "0.0");
    assert_eq!(render.printing_guide.horizontal_interval, "0.0");
}
