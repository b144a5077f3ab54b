use atelier_core::error::CoreError;

/// Errors from the remote job API layer.
#[derive(Debug, thiserror::Error)]
pub enum JobApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("request failed with status: {status}")]
    Status {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A well-formed response with a non-zero `code`.
    #[error("{0}")]
    Application(String),

    /// A create response without a task id.
    #[error("Task id missing in response")]
    MissingTaskId,
}

/// Errors surfaced by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] JobApiError),

    #[error("Insufficient credits: {required} required, {remaining} remaining")]
    InsufficientCredits { required: u32, remaining: u32 },

    /// A newer submission started before this one was acknowledged.
    #[error("Submission superseded by a newer request")]
    Superseded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}
