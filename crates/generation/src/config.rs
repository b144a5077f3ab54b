use std::time::Duration;

use crate::error::ConfigError;

/// Interval between task status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

/// Default HTTP request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Job API client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Base URL of the job API.
    pub api_url: String,
    pub poll_interval: Duration,
    /// `None` leaves requests without a timeout.
    pub request_timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

impl GenerationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `ATELIER_API_URL`              | `http://localhost:3000` |
    /// | `ATELIER_POLL_INTERVAL_MS`     | `4000`                  |
    /// | `ATELIER_REQUEST_TIMEOUT_SECS` | `30` (`0` disables)     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ATELIER_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let poll_ms = parse_u64(&lookup, "ATELIER_POLL_INTERVAL_MS")?;
        let poll_interval = match poll_ms {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    var: "ATELIER_POLL_INTERVAL_MS",
                    value: "0".into(),
                })
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_POLL_INTERVAL,
        };

        let request_timeout = match parse_u64(&lookup, "ATELIER_REQUEST_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        };

        Ok(Self {
            api_url,
            poll_interval,
            request_timeout,
        })
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
