//! The `firetail:<token>:<payload>` line format.
//!
//! [`LogLine`] renders the line the wrapper emits and parses it back, the way
//! the collector does when it reads function logs. Parsing tolerates the
//! timestamp, request id and level that the Lambda runtime may put in front of
//! the line.

use std::fmt;

use thiserror::Error;

use crate::config::{DEFAULT_TOKEN_SEGMENT, LOG_PREFIX};
use crate::error::LoggerError;
use crate::record::InvocationRecord;

/// Failure to read a log line back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line did not split into at least prefix, token and payload.
    #[error("record had {0} parts when split by ':'")]
    PartCount(usize),

    /// The first of the three segments was not `firetail`.
    #[error("record did not have firetail prefix")]
    MissingPrefix,

    /// The token segment was empty.
    #[error("firetail prefixed record did not have valid token")]
    InvalidToken,

    /// The payload was not valid base64.
    #[error("failed to b64 decode firetail record, err: {0}")]
    Base64(String),

    /// The decoded payload was not a JSON invocation record.
    #[error("failed to unmarshal firetail event: {0}")]
    Json(String),
}

/// A single FireTail log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    token: Option<String>,
    payload: String,
}

impl LogLine {
    /// Encodes a record into a line carrying the given token.
    pub fn from_record(
        token: Option<&str>,
        record: &InvocationRecord,
    ) -> Result<Self, LoggerError> {
        Ok(Self {
            token: token.map(str::to_string),
            payload: record.encode()?,
        })
    }

    /// The tenant token, or `None` for the `log-ext` default.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The base64 payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Parses a line as read from the function's log stream.
    ///
    /// ```rust
    /// use firetail_lambda_logger::{InvocationRecord, LogLine};
    /// use serde_json::json;
    ///
    /// let record = InvocationRecord::new(json!({"path": "/"}), json!("ok"));
    /// let line = LogLine::from_record(Some("abc123"), &record).unwrap().to_string();
    ///
    /// let parsed = LogLine::parse(&format!("2023-02-09T14:12:59.574Z\tid\tINFO\t{}\n", line)).unwrap();
    /// assert_eq!(parsed.token(), Some("abc123"));
    /// assert_eq!(parsed.decode_record().unwrap(), record);
    /// ```
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        let parts: Vec<&str> = line.trim_end().split(':').collect();
        if parts.len() < 3 {
            return Err(DecodeError::PartCount(parts.len()));
        }

        let [prefix, token, payload] = [
            parts[parts.len() - 3],
            parts[parts.len() - 2],
            parts[parts.len() - 1],
        ];

        if !has_firetail_prefix(prefix) {
            return Err(DecodeError::MissingPrefix);
        }
        if token.is_empty() {
            return Err(DecodeError::InvalidToken);
        }

        Ok(Self {
            token: (token != DEFAULT_TOKEN_SEGMENT).then(|| token.to_string()),
            payload: payload.to_string(),
        })
    }

    /// Decodes the payload into an [`InvocationRecord`].
    pub fn decode_record(&self) -> Result<InvocationRecord, DecodeError> {
        InvocationRecord::decode(&self.payload)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            LOG_PREFIX,
            self.token.as_deref().unwrap_or(DEFAULT_TOKEN_SEGMENT),
            self.payload
        )
    }
}

// The segment is either exactly `firetail` or ends a runtime-prefixed
// segment such as `574Z    <request-id>    INFO    firetail`.
fn has_firetail_prefix(segment: &str) -> bool {
    match segment.strip_suffix(LOG_PREFIX) {
        Some("") => true,
        Some(rest) => rest.ends_with(char::is_whitespace),
        None => false,
    }
}

/// A record recovered from a log line, with the token it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// Tenant token, `None` for `log-ext`
    pub token: Option<String>,
    /// The decoded record
    pub record: InvocationRecord,
}

/// Records and errors collected from a batch of log lines.
#[derive(Debug, Default)]
pub struct ExtractedRecords {
    /// Successfully decoded records, in input order
    pub records: Vec<DecodedRecord>,
    /// One error per line that failed to decode, in input order
    pub errors: Vec<DecodeError>,
}

impl ExtractedRecords {
    /// Returns true if every line decoded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decodes every line, keeping going past failures.
pub fn extract_records<'a, I>(lines: I) -> ExtractedRecords
where
    I: IntoIterator<Item = &'a str>,
{
    let mut extracted = ExtractedRecords::default();

    for line in lines {
        match LogLine::parse(line).and_then(|l| {
            let record = l.decode_record()?;
            Ok(DecodedRecord {
                token: l.token,
                record,
            })
        }) {
            Ok(decoded) => extracted.records.push(decoded),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping line that is not a FireTail record");
                extracted.errors.push(e);
            }
        }
    }

    extracted
}
