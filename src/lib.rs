//! # FireTail Lambda Logger
//!
//! Wraps AWS Lambda handlers so that every successful invocation is reported
//! to the FireTail Lambda extension.
//!
//! ## Overview
//!
//! The FireTail extension scrapes the function's standard output through the
//! Lambda logs API. For each successful call the wrapper prints one line:
//!
//! ```text
//! firetail:<token or "log-ext">:<base64 of {"event": .., "response": ..}>
//! ```
//!
//! It then waits until the call has lasted at least the configured timing
//! floor, so the logs API has time to hand the line to the extension before
//! the execution environment is frozen.
//!
//! ### Key Features
//!
//! - **Transparent wrapping**: the handler's response is returned unchanged.
//! - **Failures pass through**: a handler error is returned as-is, with no
//!   line and no padding.
//! - **Configurable floor**: [`DEFAULT_TIMING_FLOOR`] (500ms) or
//!   [`FAST_TIMING_FLOOR`] (25ms), or any [`std::time::Duration`].
//! - **Injectable sinks**: write to stdout in production and to a
//!   [`MemorySink`] in tests.
//! - **Decoding**: [`LogLine::parse`] and [`extract_records`] read lines back
//!   the way the collector does.
//!
//! ## Getting Started
//!
//! ### Synchronous handlers
//!
//! ```rust
//! use std::time::Duration;
//! use firetail_lambda_logger::{FiretailLogger, LoggerConfig, LogLine, MemorySink};
//! use serde_json::{json, Value};
//!
//! fn endpoint(_event: Value, _ctx: ()) -> Result<Value, String> {
//!     Ok(json!({"statusCode": 200, "body": "ok"}))
//! }
//!
//! let sink = MemorySink::new();
//! let config = LoggerConfig::new()
//!     .with_token("abc123")
//!     .with_timing_floor(Duration::from_millis(25));
//! let logger = FiretailLogger::with_sink(endpoint, config, sink.clone()).unwrap();
//!
//! let response = logger.invoke(json!({"path": "/"}), ()).unwrap();
//! assert_eq!(response["statusCode"], 200);
//!
//! let line = LogLine::parse(&sink.lines()[0]).unwrap();
//! assert_eq!(line.token(), Some("abc123"));
//! assert_eq!(line.decode_record().unwrap().event, json!({"path": "/"}));
//! ```
//!
//! ### Lambda runtime
//!
//! [`LambdaFiretailLogger`] wraps async handlers and plugs into
//! `lambda_runtime` through [`lambda::run`]. See the [`lambda`] module.
//!
//! ## Configuration
//!
//! The wrapper never reads the environment itself. Entry points usually call
//! [`LoggerConfig::from_env`], which reads `FIRETAIL_TOKEN` and
//! `FIRETAIL_LOG_FLOOR_MS`.
//!
//! ## Logging
//!
//! Diagnostics (padding applied, emit failures) go through `tracing`. The
//! FireTail line itself is written by the sink and never through `tracing`.
//!
//! ## Module Organization
//!
//! - [`config`]: [`LoggerConfig`], timing anchor and constants
//! - [`error`]: [`LoggerError`] and [`InvokeError`]
//! - [`lambda`]: async wrapper for `lambda_runtime`
//! - [`log_line`]: line formatting, parsing and batch extraction
//! - [`record`]: [`InvocationRecord`] and its base64 JSON payload
//! - [`sink`]: [`LogSink`] and its implementations
//! - [`timing`]: [`TimingPolicy`]
//! - [`wrapper`]: the synchronous [`FiretailLogger`]

pub mod config;
pub mod error;
mod finite;
pub mod lambda;
pub mod log_line;
pub mod record;
pub mod sink;
pub mod timing;
pub mod wrapper;

pub use config::{
    LoggerConfig, TimingAnchor, DEFAULT_TIMING_FLOOR, DEFAULT_TOKEN_SEGMENT, FAST_TIMING_FLOOR,
    LOG_PREFIX, TIMING_FLOOR_ENV_VAR, TOKEN_ENV_VAR,
};
pub use error::{InvokeError, LoggerError};
pub use lambda::LambdaFiretailLogger;
pub use log_line::{extract_records, DecodeError, DecodedRecord, ExtractedRecords, LogLine};
pub use record::InvocationRecord;
pub use sink::{LogSink, MemorySink, StdoutSink};
pub use timing::TimingPolicy;
pub use wrapper::FiretailLogger;
