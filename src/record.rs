//! The invocation record and its wire encoding.
//!
//! A record pairs the event a handler received with the response it returned.
//! On the wire it is the UTF-8 JSON of `{"event": .., "response": ..}`,
//! encoded with standard padded base64 so it fits on one line.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoggerError;
use crate::finite::ensure_finite;

/// One observed invocation.
///
/// Both halves are opaque JSON trees; no schema is imposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// The event passed to the handler
    pub event: Value,
    /// The value the handler returned
    pub response: Value,
    /// Seconds between call start and handler return, when enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
}

impl InvocationRecord {
    /// Creates a record from already captured JSON values.
    pub fn new(event: Value, response: Value) -> Self {
        Self {
            event,
            response,
            execution_time: None,
        }
    }

    /// Sets the execution time in seconds.
    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time = Some(seconds);
        self
    }

    /// Captures any serializable event and response.
    ///
    /// Fails with [`LoggerError::Serialization`] when either value cannot be
    /// represented as JSON.
    pub fn capture<E, R>(event: &E, response: &R) -> Result<Self, LoggerError>
    where
        E: Serialize + ?Sized,
        R: Serialize + ?Sized,
    {
        Ok(Self::new(capture_value(event)?, capture_value(response)?))
    }

    /// Serializes the record to its JSON text.
    pub fn to_json(&self) -> Result<String, LoggerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes and base64-encodes the record.
    ///
    /// ```rust
    /// use firetail_lambda_logger::InvocationRecord;
    /// use serde_json::json;
    ///
    /// let record = InvocationRecord::new(json!({"path": "/"}), json!("ok"));
    /// let payload = record.encode().unwrap();
    /// assert_eq!(InvocationRecord::decode(&payload).unwrap(), record);
    /// ```
    pub fn encode(&self) -> Result<String, LoggerError> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    /// Decodes a base64 payload back into a record.
    pub fn decode(payload: &str) -> Result<Self, crate::log_line::DecodeError> {
        use crate::log_line::DecodeError;

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DecodeError::Base64(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))
    }
}

/// Converts a serializable value to a JSON tree.
///
/// Non-finite floats are rejected rather than written as `null`.
pub(crate) fn capture_value<T>(value: &T) -> Result<Value, LoggerError>
where
    T: Serialize + ?Sized,
{
    ensure_finite(value)
        .and_then(|()| serde_json::to_value(value).map_err(LoggerError::from))
        .map_err(|e| {
            tracing::warn!(error = %e, "Value cannot be represented as JSON");
            e
        })
}
