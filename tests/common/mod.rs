//! Shared test utilities for integration tests.
//!
//! Handlers, fixtures and proptest strategies used across the integration
//! test files.

#![allow(dead_code)] // These utilities are used by other integration test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use firetail_lambda_logger::{InvocationRecord, LogLine};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Tolerance for scheduler jitter when checking the timing floor.
pub const SCHEDULING_TOLERANCE: Duration = Duration::from_millis(5);

/// The response used by the concrete scenarios.
pub fn ok_response() -> Value {
    json!({"statusCode": 200, "body": "ok"})
}

/// Handler returning [`ok_response`] for any event.
pub fn ok_handler(_event: Value, _ctx: ()) -> Result<Value, HandlerError> {
    Ok(ok_response())
}

/// Handler echoing the event back inside the response.
pub fn echo_handler(event: Value, _ctx: ()) -> Result<Value, HandlerError> {
    Ok(json!({"statusCode": 200, "echo": event}))
}

/// Handler that always fails.
pub fn failing_handler(_event: Value, _ctx: ()) -> Result<Value, HandlerError> {
    Err(HandlerError::new("database timeout"))
}

/// The error type returned by the test handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "handler error: {}", self.message)
    }
}

impl std::error::Error for HandlerError {}

/// Counts handler calls.
#[derive(Debug, Default)]
pub struct CallCounter(AtomicUsize);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parses and decodes an emitted line, panicking on failure.
pub fn decode_line(line: &str) -> InvocationRecord {
    LogLine::parse(line)
        .expect("emitted line must parse")
        .decode_record()
        .expect("emitted payload must decode")
}

/// Decodes an emitted line into the raw JSON object it carries.
pub fn decode_line_json(line: &str) -> Value {
    let record = decode_line(line);
    serde_json::to_value(record).expect("record serializes")
}

// =============================================================================
// Proptest Strategies
// =============================================================================

/// Strategy for arbitrary JSON trees, finite floats included.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<f64>()
            .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
            .prop_map(|f| json!(f)),
        "[ -~]{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for tokens that are valid in a log line.
pub fn token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}"
}
