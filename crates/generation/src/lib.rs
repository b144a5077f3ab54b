//! Portrait-retouch generation task orchestration.
//!
//! Builds a generation request from beauty selections and a free-text
//! prompt, submits it to the remote job API, polls the task until it
//! reaches a terminal status, and normalizes the reported images.
//!
//! Each submission bumps an epoch counter; poll responses carrying an
//! older epoch or task id are discarded, so a superseded task can never
//! overwrite the state of the current one.

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod messages;
pub mod orchestrator;
pub mod request;
pub mod task;

pub use api::{HttpJobApi, JobApi};
pub use config::GenerationConfig;
pub use error::{ConfigError, GenerationError, JobApiError};
pub use orchestrator::{GenerationEvent, GenerationOrchestrator};
pub use request::GenerationRequest;
pub use task::{GeneratedImage, GenerationTask, TaskPhase};
