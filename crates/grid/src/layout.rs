//! Canvas geometry: output dimensions, grid line positions, label anchors.
//!
//! Pure arithmetic over the canvas size and grid settings; nothing here
//! touches pixels.

use atelier_core::grid::{cell_label, GridSettings};
use serde::Serialize;

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Widest canvas produced; wider sources are scaled down.
pub const MAX_CANVAS_WIDTH: u32 = 1600;

/// Canvas width used when the source reports a degenerate width.
pub const FALLBACK_CANVAS_WIDTH: u32 = 800;

/// Label offset from the cell's left edge and bottom edge, in pixels.
pub const LABEL_INSET: f32 = 6.0;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Output raster dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// One straight grid line spanning the full canvas.
///
/// `position` is the x coordinate of a vertical line or the y coordinate
/// of a horizontal one; the line runs from `start` to `end` along the
/// other axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    pub axis: Axis,
    pub position: f32,
    pub start: f32,
    pub end: f32,
}

/// A cell label and its anchor (left edge, bottom of the text box).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/* --------------------------------------------------------------------------
Geometry
-------------------------------------------------------------------------- */

/// Canvas dimensions for a source of `source_width` x `source_height`.
///
/// Width is the source width capped at [`MAX_CANVAS_WIDTH`], or
/// [`FALLBACK_CANVAS_WIDTH`] for a degenerate source. Height follows the
/// source aspect ratio unless square cells are forced, in which case it is
/// `width / (columns / rows)` and the image is stretched to fit.
pub fn canvas_size(source_width: u32, source_height: u32, settings: &GridSettings) -> CanvasSize {
    let mut width = source_width.min(MAX_CANVAS_WIDTH);
    if width < 1 {
        width = FALLBACK_CANVAS_WIDTH;
    }

    let mut height = if source_width > 0 {
        (f64::from(source_height) / f64::from(source_width) * f64::from(width)).round()
    } else {
        0.0
    };

    if settings.forces_square_cells() && settings.rows > 0 {
        let aspect = f64::from(settings.columns) / f64::from(settings.rows);
        if aspect > 0.0 {
            height = (f64::from(width) / aspect).round();
        }
    }

    CanvasSize {
        width,
        height: (height as u32).max(1),
    }
}

/// The `columns - 1` vertical and `rows - 1` horizontal interior lines.
pub fn grid_lines(size: CanvasSize, settings: &GridSettings) -> Vec<LineSegment> {
    let width = size.width as f32;
    let height = size.height as f32;
    let mut lines = Vec::with_capacity(
        settings.columns.saturating_sub(1) as usize + settings.rows.saturating_sub(1) as usize,
    );

    if settings.columns > 0 {
        let column_width = width / settings.columns as f32;
        lines.extend((1..settings.columns).map(|i| LineSegment {
            axis: Axis::Vertical,
            position: i as f32 * column_width,
            start: 0.0,
            end: height,
        }));
    }

    if settings.rows > 0 {
        let row_height = height / settings.rows as f32;
        lines.extend((1..settings.rows).map(|i| LineSegment {
            axis: Axis::Horizontal,
            position: i as f32 * row_height,
            start: 0.0,
            end: width,
        }));
    }

    lines
}

/// One label per cell, row-major, anchored [`LABEL_INSET`] px right of the
/// cell's left edge and above its bottom edge.
pub fn label_placements(size: CanvasSize, settings: &GridSettings) -> Vec<LabelPlacement> {
    if settings.rows == 0 || settings.columns == 0 {
        return Vec::new();
    }
    let column_width = size.width as f32 / settings.columns as f32;
    let row_height = size.height as f32 / settings.rows as f32;

    (0..settings.rows)
        .flat_map(|row| {
            (0..settings.columns).map(move |col| LabelPlacement {
                text: cell_label(row, col),
                x: col as f32 * column_width + LABEL_INSET,
                y: (row + 1) as f32 * row_height - LABEL_INSET,
            })
        })
        .collect()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
