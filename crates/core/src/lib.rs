//! Domain catalogs and pure logic shared by the grid maker and the
//! portrait-retouch generator.
//!
//! Nothing in this crate performs I/O: paper formats, grid settings,
//! printing-guide arithmetic, the beauty-prompt and model catalogs,
//! prompt payload construction and result URL extraction all live here
//! so they can be tested without a canvas or a network.

pub mod beauty;
pub mod error;
pub mod extract;
pub mod grid;
pub mod models;
pub mod paper;
pub mod printing;
pub mod prompt;
pub mod types;
pub mod upload;
