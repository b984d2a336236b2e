//! The synchronous logging wrapper.
//!
//! [`FiretailLogger`] owns a handler and exposes the same two-argument call.
//! Each successful call emits one FireTail line and is padded up to the timing
//! floor before the response is handed back. A failing handler is passed
//! straight through: no line, no padding.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use crate::config::LoggerConfig;
use crate::error::{InvokeError, LoggerError};
use crate::log_line::LogLine;
use crate::record::{capture_value, InvocationRecord};
use crate::sink::{LogSink, StdoutSink};
use crate::timing::{saturating_millis, TimingPolicy};

/// Wraps a synchronous `Fn(event, context) -> Result<response, error>` handler.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use firetail_lambda_logger::{FiretailLogger, LoggerConfig, MemorySink};
/// use serde_json::{json, Value};
///
/// let sink = MemorySink::new();
/// let logger = FiretailLogger::with_sink(
///     |event: Value, _ctx: ()| -> Result<Value, String> {
///         Ok(json!({"statusCode": 200, "echo": event}))
///     },
///     LoggerConfig::new().with_timing_floor(Duration::ZERO),
///     sink.clone(),
/// )
/// .unwrap();
///
/// let response = logger.invoke(json!({"path": "/"}), ()).unwrap();
/// assert_eq!(response["statusCode"], 200);
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FiretailLogger<H, S = StdoutSink> {
    handler: H,
    config: LoggerConfig,
    timing: TimingPolicy,
    sink: S,
}

impl<H> FiretailLogger<H, StdoutSink> {
    /// Wraps `handler`, writing lines to standard output.
    pub fn new(handler: H, config: LoggerConfig) -> Result<Self, LoggerError> {
        FiretailLogger::with_sink(handler, config, StdoutSink)
    }
}

impl<H, S: LogSink> FiretailLogger<H, S> {
    /// Wraps `handler`, writing lines to `sink`.
    ///
    /// Fails if the configured token cannot be embedded in a log line.
    pub fn with_sink(handler: H, config: LoggerConfig, sink: S) -> Result<Self, LoggerError> {
        config.validate()?;
        Ok(Self {
            handler,
            timing: TimingPolicy::from(&config),
            config,
            sink,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// The sink lines are written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Calls the handler, logs the invocation and pads to the timing floor.
    ///
    /// Blocks the calling thread for the padding. The handler's response is
    /// returned unchanged; a handler error is returned as
    /// [`InvokeError::Handler`] without logging or padding.
    pub fn invoke<Ev, C, R, E>(&self, event: Ev, context: C) -> Result<R, InvokeError<E>>
    where
        H: Fn(Ev, C) -> Result<R, E>,
        Ev: Serialize,
        R: Serialize,
    {
        let started = Instant::now();
        // The handler takes the event by value, so capture it first. A capture
        // failure only surfaces once the handler has succeeded.
        let event_json = capture_value(&event);

        let response = (self.handler)(event, context).map_err(InvokeError::Handler)?;
        let handler_elapsed = started.elapsed();

        emit_record(&self.config, &self.sink, event_json, &response, handler_elapsed)?;

        let padding = self.timing.padding_after(started, Instant::now());
        if !padding.is_zero() {
            tracing::debug!(
                padding_ms = saturating_millis(padding),
                floor_ms = saturating_millis(self.timing.floor()),
                "Padding invocation to timing floor"
            );
            std::thread::sleep(padding);
        }

        Ok(response)
    }
}

/// Serializes the record and writes one line to the sink.
///
/// Nothing is written unless both event and response serialize.
pub(crate) fn emit_record<R, S>(
    config: &LoggerConfig,
    sink: &S,
    event: Result<Value, LoggerError>,
    response: &R,
    handler_elapsed: Duration,
) -> Result<(), LoggerError>
where
    R: Serialize + ?Sized,
    S: LogSink + ?Sized,
{
    let mut record = InvocationRecord::new(event?, capture_value(response)?);
    if config.include_execution_time {
        record = record.with_execution_time(handler_elapsed.as_secs_f64());
    }

    let line = LogLine::from_record(config.token.as_deref(), &record)?;
    sink.emit(&line.to_string()).map_err(|e| {
        tracing::warn!(error = %e, "Failed to emit FireTail log line");
        e
    })?;

    tracing::debug!(
        payload_len = line.payload().len(),
        has_token = config.token.is_some(),
        "Emitted FireTail log line"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn no_floor() -> LoggerConfig {
        LoggerConfig::new().with_timing_floor(Duration::ZERO)
    }

    fn ok_handler(_event: Value, _ctx: &str) -> Result<Value, String> {
        Ok(json!({"statusCode": 200, "body": "ok"}))
    }

    #[test]
    fn test_new_rejects_invalid_token() {
        let err = FiretailLogger::new(ok_handler, LoggerConfig::new().with_token("a:b"))
            .err()
            .unwrap();
        assert!(matches!(err, LoggerError::Validation { .. }));
    }

    #[test]
    fn test_invoke_returns_response_unchanged() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(ok_handler, no_floor(), sink.clone()).unwrap();

        let response = logger.invoke(json!({"path": "/"}), "ctx").unwrap();
        assert_eq!(response, json!({"statusCode": 200, "body": "ok"}));
    }

    #[test]
    fn test_invoke_emits_one_decodable_line() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(ok_handler, no_floor(), sink.clone()).unwrap();

        logger.invoke(json!({"path": "/"}), "ctx").unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("firetail:log-ext:"));

        let record = LogLine::parse(&lines[0]).unwrap().decode_record().unwrap();
        assert_eq!(record.event, json!({"path": "/"}));
        assert_eq!(record.response, json!({"statusCode": 200, "body": "ok"}));
        assert!(record.execution_time.is_none());
    }

    #[test]
    fn test_invoke_uses_token() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            ok_handler,
            no_floor().with_token("abc123"),
            sink.clone(),
        )
        .unwrap();

        logger.invoke(json!({}), "ctx").unwrap();
        assert!(sink.lines()[0].starts_with("firetail:abc123:"));
    }

    #[test]
    fn test_handler_error_passes_through_without_logging() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<Value, String> { Err("handler exploded".to_string()) },
            LoggerConfig::new(),
            sink.clone(),
        )
        .unwrap();

        let started = Instant::now();
        let err = logger.invoke(json!({"path": "/"}), ()).unwrap_err();

        assert_eq!(err.into_handler_error(), Some("handler exploded".to_string()));
        assert!(sink.is_empty());
        // Failure skips the 500ms default floor.
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn test_context_passed_through() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: Value, ctx: &str| -> Result<String, String> { Ok(ctx.to_uppercase()) },
            no_floor(),
            sink.clone(),
        )
        .unwrap();

        assert_eq!(logger.invoke(json!(null), "request-42").unwrap(), "REQUEST-42");
    }

    #[test]
    fn test_unserializable_response_is_serialization_error() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<HashMap<(u8, u8), u8>, String> {
                Ok(HashMap::from([((1, 2), 3)]))
            },
            no_floor(),
            sink.clone(),
        )
        .unwrap();

        let err = logger.invoke(json!({}), ()).unwrap_err();
        assert!(err.logger_error().unwrap().is_serialization());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_non_finite_response_is_serialization_error() {
        #[derive(Debug, Serialize)]
        struct Ratio {
            ratio: f64,
        }

        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<Ratio, String> { Ok(Ratio { ratio: f64::NAN }) },
            LoggerConfig::new(),
            sink.clone(),
        )
        .unwrap();

        let started = Instant::now();
        let err = logger.invoke(json!({}), ()).unwrap_err();

        assert!(err.logger_error().unwrap().is_serialization());
        assert!(sink.is_empty());
        // Nothing was emitted, so the default floor is not applied.
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn test_non_finite_event_is_serialization_error() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |event: Vec<f64>, _ctx: ()| -> Result<usize, String> { Ok(event.len()) },
            no_floor(),
            sink.clone(),
        )
        .unwrap();

        let err = logger.invoke(vec![1.0, f64::INFINITY], ()).unwrap_err();
        assert!(err.logger_error().unwrap().is_serialization());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unserializable_event_still_runs_handler() {
        let calls = AtomicUsize::new(0);
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: HashMap<(u8, u8), u8>, _ctx: ()| -> Result<Value, String> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!("ok"))
            },
            no_floor(),
            sink.clone(),
        )
        .unwrap();

        let err = logger.invoke(HashMap::from([((1, 2), 3)]), ()).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(err.logger_error().unwrap().is_serialization());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unserializable_event_with_failing_handler_reports_handler_error() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: HashMap<(u8, u8), u8>, _ctx: ()| -> Result<Value, &'static str> { Err("nope") },
            no_floor(),
            sink.clone(),
        )
        .unwrap();

        let err = logger.invoke(HashMap::from([((1, 2), 3)]), ()).unwrap_err();
        assert_eq!(err.handler_error(), Some(&"nope"));
    }

    #[test]
    fn test_execution_time_opt_in() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<Value, String> {
                std::thread::sleep(Duration::from_millis(5));
                Ok(json!(1))
            },
            no_floor().with_execution_time(true),
            sink.clone(),
        )
        .unwrap();

        logger.invoke(json!(0), ()).unwrap();
        let record = LogLine::parse(&sink.lines()[0]).unwrap().decode_record().unwrap();
        assert!(record.execution_time.unwrap() >= 0.005);
    }

    #[test]
    fn test_pads_to_floor() {
        let sink = MemorySink::new();
        let logger = FiretailLogger::with_sink(
            ok_handler,
            LoggerConfig::new().with_timing_floor(Duration::from_millis(40)),
            sink.clone(),
        )
        .unwrap();

        let started = Instant::now();
        logger.invoke(json!({}), "ctx").unwrap();
        assert!(started.elapsed() >= Duration::from_millis(35));
    }

    #[test]
    fn test_slow_handler_gets_no_extra_padding() {
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<Value, String> {
                std::thread::sleep(Duration::from_millis(60));
                Ok(json!("slow"))
            },
            LoggerConfig::new().with_timing_floor(Duration::from_millis(20)),
            MemorySink::new(),
        )
        .unwrap();

        let started = Instant::now();
        logger.invoke(json!({}), ()).unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(60));
        assert!(elapsed < Duration::from_millis(60 + 200));
    }

    #[test]
    fn test_emission_anchor_pads_full_floor_after_emit() {
        let logger = FiretailLogger::with_sink(
            |_event: Value, _ctx: ()| -> Result<Value, String> {
                std::thread::sleep(Duration::from_millis(30));
                Ok(json!("done"))
            },
            LoggerConfig::new()
                .with_timing_floor(Duration::from_millis(30))
                .with_timing_anchor(crate::config::TimingAnchor::Emission),
            MemorySink::new(),
        )
        .unwrap();

        let started = Instant::now();
        logger.invoke(json!({}), ()).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(55));
    }

    #[test]
    fn test_emit_failure_is_reported() {
        struct ClosedSink;
        impl LogSink for ClosedSink {
            fn emit(&self, _line: &str) -> Result<(), LoggerError> {
                Err(LoggerError::emit("stdout closed"))
            }
        }

        let logger = FiretailLogger::with_sink(ok_handler, no_floor(), ClosedSink).unwrap();
        let err = logger.invoke(json!({}), "ctx").unwrap_err();
        assert!(matches!(err.logger_error(), Some(LoggerError::Emit { .. })));
    }
}
