//! Physical paper formats used for printing-guide arithmetic.
//!
//! Paper sizes never influence canvas pixel dimensions; they only turn
//! the grid's row/column counts into real-world line spacing.

use serde::Serialize;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Unit of a paper format's dimensions. Only millimetres are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaperUnit {
    #[serde(rename = "mm")]
    Millimeters,
}

impl PaperUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            PaperUnit::Millimeters => "mm",
        }
    }
}

impl std::fmt::Display for PaperUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaperFormat {
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
    pub unit: PaperUnit,
}

/// Name of the user-sized entry in [`PAPER_FORMATS`].
pub const CUSTOM_FORMAT_NAME: &str = "Custom";

/// Format selected when nothing else is chosen.
pub const DEFAULT_FORMAT_NAME: &str = "Letter";

const fn mm(name: &'static str, width: f64, height: f64) -> PaperFormat {
    PaperFormat {
        name,
        width,
        height,
        unit: PaperUnit::Millimeters,
    }
}

/// Immutable paper catalog, in display order.
pub const PAPER_FORMATS: &[PaperFormat] = &[
    mm("A2", 420.0, 594.0),
    mm("A3", 297.0, 420.0),
    mm("A4", 210.0, 297.0),
    mm("A5", 148.0, 210.0),
    mm("Letter", 216.0, 279.0),
    mm("Legal", 216.0, 356.0),
    mm(CUSTOM_FORMAT_NAME, 0.0, 0.0),
];

/* --------------------------------------------------------------------------
Lookup
-------------------------------------------------------------------------- */

impl PaperFormat {
    /// A `Custom` format carrying user-supplied dimensions.
    ///
    /// No validation happens here: an unfilled custom format (zero sizes)
    /// is a legitimate state the printing guide must tolerate.
    pub fn custom(width: f64, height: f64) -> Self {
        mm(CUSTOM_FORMAT_NAME, width, height)
    }

    pub fn is_custom(&self) -> bool {
        self.name == CUSTOM_FORMAT_NAME
    }

    /// `true` when both dimensions are finite and positive.
    pub fn has_usable_dimensions(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Look up a catalog entry by name (case-insensitive).
pub fn find_paper_format(name: &str) -> Option<PaperFormat> {
    PAPER_FORMATS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}

/// Like [`find_paper_format`] but returns a `NotFound` error.
pub fn require_paper_format(name: &str) -> Result<PaperFormat, CoreError> {
    find_paper_format(name).ok_or_else(|| CoreError::NotFound {
        entity: "paper format",
        key: name.to_string(),
    })
}

/// The default format (Letter), falling back to the first catalog entry.
pub fn default_paper_format() -> PaperFormat {
    find_paper_format(DEFAULT_FORMAT_NAME).unwrap_or(PAPER_FORMATS[0])
}

/// Validate user-entered custom dimensions.
pub fn validate_custom_dimensions(width: f64, height: f64) -> Result<(), CoreError> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Custom paper width and height must be greater than 0 (got {width}x{height})"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seven_entries_in_order() {
        let names: Vec<_> = PAPER_FORMATS.iter().map(|f| f.name).collect();
        assert_eq!(names, ["A2", "A3", "A4", "A5", "Letter", "Legal", "Custom"]);
        assert!(PAPER_FORMATS.iter().all(|f| f.unit == PaperUnit::Millimeters));
    }

    // -- find_paper_format --

    #[test]
    fn lookup_is_case_insensitive() {
        let a4 = find_paper_format("a4").unwrap();
        assert_eq!(a4.width, 210.0);
        assert_eq!(a4.height, 297.0);
    }

    #[test]
    fn unknown_format_not_found() {
        assert!(find_paper_format("B5").is_none());
        let err = require_paper_format("B5").unwrap_err();
        assert!(err.to_string().contains("B5"));
    }

    #[test]
    fn default_is_letter() {
        assert_eq!(default_paper_format().name, "Letter");
    }

    // -- custom --

    #[test]
    fn catalog_custom_entry_is_unfilled() {
        let custom = find_paper_format("Custom").unwrap();
        assert!(custom.is_custom());
        assert!(!custom.has_usable_dimensions());
    }

    #[test]
    fn custom_with_dimensions_is_usable() {
        let custom = PaperFormat::custom(300.0, 400.0);
        assert!(custom.is_custom());
        assert!(custom.has_usable_dimensions());
    }

    #[test]
    fn custom_dimension_validation() {
        assert!(validate_custom_dimensions(100.0, 200.0).is_ok());
        assert!(validate_custom_dimensions(0.0, 200.0).is_err());
        assert!(validate_custom_dimensions(100.0, -1.0).is_err());
        assert!(validate_custom_dimensions(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn unit_serializes_as_mm() {
        let json = serde_json::to_value(find_paper_format("A5").unwrap()).unwrap();
        assert_eq!(json["unit"], "mm");
        assert_eq!(json["name"], "A5");
    }
}
