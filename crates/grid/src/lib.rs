//! Grid overlay rendering engine.
//!
//! Given an immutable source image, [`GridSettings`](atelier_core::grid::GridSettings)
//! and a paper format, produces a composite raster (scaled image, optional
//! grayscale, grid lines, optional cell labels), a PNG encoding of it, and
//! the printing guide. Every render starts again from the source, so the
//! output is a pure function of its inputs.

pub mod config;
pub mod error;
pub mod layout;
pub mod raster;
pub mod render;
pub mod session;
pub mod source;
pub mod text;

pub use config::GridConfig;
pub use error::GridError;
pub use render::{GridRender, GridRenderer};
pub use session::{GridCommand, GridSession};
pub use source::SourceImage;
pub use text::LabelFont;
