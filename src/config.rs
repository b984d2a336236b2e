//! Configuration for the FireTail logger.
//!
//! [`LoggerConfig`] carries the optional tenant token, the timing floor and
//! where the floor is measured from. Resolving values from the process
//! environment is left to the caller; [`LoggerConfig::from_env`] is provided
//! as a convenience for Lambda entry points.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// Literal first segment of every emitted log line.
pub const LOG_PREFIX: &str = "firetail";

/// Token segment used when no token is configured.
pub const DEFAULT_TOKEN_SEGMENT: &str = "log-ext";

/// Default timing floor, long enough for the logs API to deliver the line.
pub const DEFAULT_TIMING_FLOOR: Duration = Duration::from_millis(500);

/// Shorter floor for functions where 500ms per invocation is too costly.
pub const FAST_TIMING_FLOOR: Duration = Duration::from_millis(25);

/// Environment variable holding the tenant token.
pub const TOKEN_ENV_VAR: &str = "FIRETAIL_TOKEN";

/// Environment variable overriding the timing floor, in milliseconds.
pub const TIMING_FLOOR_ENV_VAR: &str = "FIRETAIL_LOG_FLOOR_MS";

/// The instant the timing floor is measured from.
///
/// ```rust
/// use firetail_lambda_logger::TimingAnchor;
///
/// assert_eq!(TimingAnchor::default(), TimingAnchor::InvocationStart);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimingAnchor {
    /// Floor covers the whole call: handler, serialization and emission.
    #[default]
    InvocationStart,
    /// Floor starts once the line has been emitted, so the full floor is
    /// always spent after the line is written.
    Emission,
}

/// Configuration for a wrapped handler.
///
/// # Example
///
/// ```rust
/// use firetail_lambda_logger::{LoggerConfig, FAST_TIMING_FLOOR};
///
/// let config = LoggerConfig::new()
///     .with_token("abc123")
///     .with_timing_floor(FAST_TIMING_FLOOR);
///
/// assert_eq!(config.token_segment(), "abc123");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Tenant token embedded in each line; `None` emits `log-ext` instead.
    pub token: Option<String>,
    /// Minimum wall-clock duration of a successful invocation.
    pub timing_floor: Duration,
    /// Where the floor is measured from.
    pub timing_anchor: TimingAnchor,
    /// Adds `execution_time` (seconds) to the record when set.
    pub include_execution_time: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            token: None,
            timing_floor: DEFAULT_TIMING_FLOOR,
            timing_anchor: TimingAnchor::default(),
            include_execution_time: false,
        }
    }
}

impl LoggerConfig {
    /// Creates a config with no token and the default 500ms floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the timing floor.
    pub fn with_timing_floor(mut self, floor: Duration) -> Self {
        self.timing_floor = floor;
        self
    }

    /// Sets the timing anchor.
    pub fn with_timing_anchor(mut self, anchor: TimingAnchor) -> Self {
        self.timing_anchor = anchor;
        self
    }

    /// Enables or disables the `execution_time` field in emitted records.
    pub fn with_execution_time(mut self, enabled: bool) -> Self {
        self.include_execution_time = enabled;
        self
    }

    /// Returns the middle segment of the log line.
    pub fn token_segment(&self) -> &str {
        self.token.as_deref().unwrap_or(DEFAULT_TOKEN_SEGMENT)
    }

    /// Checks that the token can be embedded in a log line.
    ///
    /// The collector splits lines on `:` and reads the output one line at a
    /// time, so a token must be non-empty and free of colons and line breaks.
    /// Other whitespace is kept as-is.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if let Some(token) = &self.token {
            if token.is_empty() {
                return Err(LoggerError::validation("token must not be empty"));
            }
            if token.contains(':') {
                return Err(LoggerError::validation(format!(
                    "token '{}' must not contain ':'",
                    token
                )));
            }
            if token.contains(|c: char| c == '\n' || c == '\r') {
                return Err(LoggerError::validation(
                    "token must not contain line breaks",
                ));
            }
        }
        Ok(())
    }

    /// Builds a config from the process environment.
    ///
    /// Reads [`TOKEN_ENV_VAR`] and [`TIMING_FLOOR_ENV_VAR`]. See
    /// [`LoggerConfig::from_lookup`] for the rules.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// An empty token is treated as unset. The floor must parse as whole
    /// milliseconds.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use firetail_lambda_logger::LoggerConfig;
    ///
    /// let config = LoggerConfig::from_lookup(|key| match key {
    ///     "FIRETAIL_TOKEN" => Some("abc123".to_string()),
    ///     "FIRETAIL_LOG_FLOOR_MS" => Some("25".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.token.as_deref(), Some("abc123"));
    /// assert_eq!(config.timing_floor, Duration::from_millis(25));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(token) = lookup(TOKEN_ENV_VAR).filter(|t| !t.is_empty()) {
            config.token = Some(token);
        }

        if let Some(raw) = lookup(TIMING_FLOOR_ENV_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                LoggerError::validation(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    TIMING_FLOOR_ENV_VAR, raw
                ))
            })?;
            config.timing_floor = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }
}
