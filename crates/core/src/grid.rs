//! Grid overlay settings, bounds, and cell labelling.
//!
//! Settings are owned by the caller and passed by value into each render.
//! The bounds below mirror the ranges the grid maker's controls allow.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Minimum number of rows or columns.
pub const MIN_DIVISIONS: u32 = 2;

/// Maximum number of rows or columns.
pub const MAX_DIVISIONS: u32 = 50;

pub const MIN_LINE_OPACITY: f32 = 0.1;
pub const MAX_LINE_OPACITY: f32 = 1.0;

pub const MIN_LINE_WIDTH: f32 = 1.0;
pub const MAX_LINE_WIDTH: f32 = 10.0;

/// Line width slider step, in device pixels.
pub const LINE_WIDTH_STEP: f32 = 0.5;

/// Rows beyond this count leave the single-letter `A..Z` label range.
pub const SINGLE_LETTER_ROWS: u32 = 26;

/// Default grid line colour.
pub const DEFAULT_LINE_COLOR: &str = "#130b0b";

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// How cell proportions are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    /// Cells follow the image's aspect ratio.
    #[default]
    Custom,
    /// Cells are square when combined with `adjust_image_to_fit`.
    Square,
}

/// User-controlled grid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub rows: u32,
    pub columns: u32,
    pub line_color: String,
    pub line_opacity: f32,
    pub line_width: f32,
    pub show_labels: bool,
    pub grid_type: GridType,
    pub adjust_image_to_fit: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: 6,
            columns: 4,
            line_color: DEFAULT_LINE_COLOR.to_string(),
            line_opacity: 0.5,
            line_width: 1.0,
            show_labels: true,
            grid_type: GridType::Custom,
            adjust_image_to_fit: false,
        }
    }
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettingsPatch {
    pub rows: Option<u32>,
    pub columns: Option<u32>,
    pub line_color: Option<String>,
    pub line_opacity: Option<f32>,
    pub line_width: Option<f32>,
    pub show_labels: Option<bool>,
    pub grid_type: Option<GridType>,
    pub adjust_image_to_fit: Option<bool>,
}

/* --------------------------------------------------------------------------
Validation and normalisation
-------------------------------------------------------------------------- */

impl GridSettings {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_divisions("rows", self.rows)?;
        validate_divisions("columns", self.columns)?;
        if !(MIN_LINE_OPACITY..=MAX_LINE_OPACITY).contains(&self.line_opacity) {
            return Err(CoreError::Validation(format!(
                "Line opacity must be between {MIN_LINE_OPACITY} and {MAX_LINE_OPACITY} (got {})",
                self.line_opacity
            )));
        }
        if !(MIN_LINE_WIDTH..=MAX_LINE_WIDTH).contains(&self.line_width) {
            return Err(CoreError::Validation(format!(
                "Line width must be between {MIN_LINE_WIDTH} and {MAX_LINE_WIDTH} (got {})",
                self.line_width
            )));
        }
        parse_hex_color(&self.line_color)?;
        Ok(())
    }

    /// Snap every numeric field into range, the way the range controls do.
    ///
    /// The colour is left untouched; use [`validate`](Self::validate) or
    /// [`line_rgb`](Self::line_rgb) to check it.
    pub fn clamped(mut self) -> Self {
        self.rows = self.rows.clamp(MIN_DIVISIONS, MAX_DIVISIONS);
        self.columns = self.columns.clamp(MIN_DIVISIONS, MAX_DIVISIONS);
        self.line_opacity = if self.line_opacity.is_nan() {
            MAX_LINE_OPACITY
        } else {
            self.line_opacity.clamp(MIN_LINE_OPACITY, MAX_LINE_OPACITY)
        };
        self.line_width = if self.line_width.is_nan() {
            MIN_LINE_WIDTH
        } else {
            let stepped = (self.line_width / LINE_WIDTH_STEP).round() * LINE_WIDTH_STEP;
            stepped.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
        };
        self
    }

    /// Merge a partial update, then clamp.
    pub fn apply(&self, patch: GridSettingsPatch) -> Self {
        let mut next = self.clone();
        if let Some(rows) = patch.rows {
            next.rows = rows;
        }
        if let Some(columns) = patch.columns {
            next.columns = columns;
        }
        if let Some(color) = patch.line_color {
            next.line_color = color;
        }
        if let Some(opacity) = patch.line_opacity {
            next.line_opacity = opacity;
        }
        if let Some(width) = patch.line_width {
            next.line_width = width;
        }
        if let Some(show) = patch.show_labels {
            next.show_labels = show;
        }
        if let Some(grid_type) = patch.grid_type {
            next.grid_type = grid_type;
        }
        if let Some(fit) = patch.adjust_image_to_fit {
            next.adjust_image_to_fit = fit;
        }
        next.clamped()
    }

    /// `true` when the canvas aspect ratio is forced to `columns / rows`.
    pub fn forces_square_cells(&self) -> bool {
        self.grid_type == GridType::Square && self.adjust_image_to_fit
    }

    /// Parsed line colour.
    pub fn line_rgb(&self) -> Result<[u8; 3], CoreError> {
        parse_hex_color(&self.line_color)
    }
}

fn validate_divisions(field: &str, value: u32) -> Result<(), CoreError> {
    if !(MIN_DIVISIONS..=MAX_DIVISIONS).contains(&value) {
        return Err(CoreError::Validation(format!(
            "Grid {field} must be between {MIN_DIVISIONS} and {MAX_DIVISIONS} (got {value})"
        )));
    }
    Ok(())
}

/// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid hex colour '{value}'"));
    let hex = value.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let nibble = channel(&c.to_string())?;
                rgb[i] = nibble * 17;
            }
            Ok(rgb)
        }
        6 => Ok([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => Err(invalid()),
    }
}

/* --------------------------------------------------------------------------
Cell labels
-------------------------------------------------------------------------- */

/// Letter for a 0-based row: the character at codepoint `65 + row`.
///
/// Rows past `Z` are not remapped; see [`exceeds_single_letter_rows`].
pub fn row_letter(row: u32) -> char {
    char::from_u32(65 + row).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Label drawn inside the cell at (`row`, `col`), both 0-based: `A1`, `B3`, ...
pub fn cell_label(row: u32, col: u32) -> String {
    format!("{}{}", row_letter(row), col + 1)
}

/// `true` when some rows would be labelled past `Z`.
pub fn exceeds_single_letter_rows(rows: u32) -> bool {
    rows > SINGLE_LETTER_ROWS
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
