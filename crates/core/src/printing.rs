//! Printing guide: physical spacing of grid lines on a chosen paper format.
//!
//! The guide depends only on the grid's row/column counts and the paper
//! dimensions, never on canvas pixels.

use serde::Serialize;

use crate::grid::GridSettings;
use crate::paper::PaperFormat;

/// Read-only summary shown next to the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintingGuide {
    /// Number of vertical lines (`columns - 1`).
    pub vertical_count: u32,
    /// Number of horizontal lines (`rows - 1`).
    pub horizontal_count: u32,
    /// Distance between vertical lines, one decimal place.
    pub vertical_interval: String,
    /// Distance between horizontal lines, one decimal place.
    pub horizontal_interval: String,
    /// Label of the bottom-right cell.
    pub last_label: String,
}

impl PrintingGuide {
    /// Compute the guide for the given settings and paper format.
    pub fn compute(settings: &GridSettings, paper: &PaperFormat) -> Self {
        Self {
            vertical_count: settings.columns.saturating_sub(1),
            horizontal_count: settings.rows.saturating_sub(1),
            vertical_interval: interval(paper.width, settings.columns),
            horizontal_interval: interval(paper.height, settings.rows),
            last_label: last_label(settings.rows, settings.columns),
        }
    }

    /// The guide as the three plain-text bullet lines of the preview panel.
    ///
    /// The label line is only included when labels are shown.
    pub fn lines_summary(&self, paper: &PaperFormat, show_labels: bool) -> Vec<String> {
        let unit = paper.unit;
        let mut lines = vec![
            format!(
                "{} vertical lines, {} {unit} apart",
                self.vertical_count, self.vertical_interval
            ),
            format!(
                "{} horizontal lines, {} {unit} apart",
                self.horizontal_count, self.horizontal_interval
            ),
        ];
        if show_labels {
            lines.push(format!("Cells labelled A1 to {}", self.last_label));
        }
        lines
    }
}

/// `length / divisions` with one decimal, or `"0"` when there are no divisions.
///
/// Ties round up (`74.25` gives `"74.3"`), not to even.
fn interval(length: f64, divisions: u32) -> String {
    if divisions == 0 {
        return "0".to_string();
    }
    let tenths = (length / f64::from(divisions) * 10.0 + 0.5).floor();
    format!("{:.1}", tenths / 10.0)
}

/// Bottom-right cell label: codepoint `64 + rows`, then `columns`.
///
/// Uses the 1-based row count directly, independently of
/// [`crate::grid::cell_label`]'s 0-based rule. Both agree on the result for
/// the supported range.
pub fn last_label(rows: u32, columns: u32) -> String {
    let letter = char::from_u32(64 + rows).unwrap_or(char::REPLACEMENT_CHARACTER);
    format!("{letter}{columns}")
}
