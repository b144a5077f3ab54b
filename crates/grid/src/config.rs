use std::path::PathBuf;

/// Env var naming a TTF/OTF file used for cell labels.
pub const LABEL_FONT_ENV: &str = "ATELIER_LABEL_FONT";

/// Rendering configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridConfig {
    /// Explicit label font; when `None`, a system sans-serif font is used.
    pub label_font: Option<PathBuf>,
}

impl GridConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default                     |
    /// |----------------------|-----------------------------|
    /// | `ATELIER_LABEL_FONT` | unset (system sans-serif)   |
    pub fn from_env() -> Self {
        let label_font = std::env::var_os(LABEL_FONT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { label_font }
    }
}
