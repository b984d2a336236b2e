//! Error types for the FireTail Lambda logger.
//!
//! The logger distinguishes its own failures ([`LoggerError`]) from failures of
//! the wrapped handler. [`InvokeError`] carries either one, and a handler error
//! is always carried through untouched.

use std::fmt;

use thiserror::Error;

/// Errors raised by the logger itself.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The event or response could not be represented as JSON.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Invalid configuration, such as a token that would break the line format.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation failure
        message: String,
    },

    /// The sink failed to write the log line.
    #[error("Emit error: {message}")]
    Emit {
        /// Error message from the underlying writer
        message: String,
    },
}

impl LoggerError {
    /// Creates a new Serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new Emit error.
    pub fn emit(message: impl Into<String>) -> Self {
        Self::Emit {
            message: message.into(),
        }
    }

    /// Returns true if this is a Serialization error.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

impl From<serde_json::Error> for LoggerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(error: std::io::Error) -> Self {
        Self::Emit {
            message: error.to_string(),
        }
    }
}

/// Outcome of a failed wrapped invocation.
///
/// `Handler` holds the wrapped handler's own error exactly as it was returned.
/// No log line is emitted and no padding is applied in that case.
#[derive(Debug)]
pub enum InvokeError<E> {
    /// The wrapped handler failed.
    Handler(E),
    /// The handler succeeded but the invocation record could not be logged.
    Logger(LoggerError),
}

impl<E> InvokeError<E> {
    /// Returns true if the wrapped handler produced this error.
    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }

    /// Returns the handler's error, if that is what failed.
    pub fn handler_error(&self) -> Option<&E> {
        match self {
            Self::Handler(error) => Some(error),
            Self::Logger(_) => None,
        }
    }

    /// Returns the logger's error, if that is what failed.
    pub fn logger_error(&self) -> Option<&LoggerError> {
        match self {
            Self::Handler(_) => None,
            Self::Logger(error) => Some(error),
        }
    }

    /// Consumes the error and returns the handler's error, if any.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            Self::Handler(error) => Some(error),
            Self::Logger(_) => None,
        }
    }
}

impl<E> From<LoggerError> for InvokeError<E> {
    fn from(error: LoggerError) -> Self {
        Self::Logger(error)
    }
}

impl<E: fmt::Display> fmt::Display for InvokeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(error) => write!(f, "{}", error),
            Self::Logger(error) => write!(f, "{}", error),
        }
    }
}

impl<E> std::error::Error for InvokeError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler(error) => Some(error),
            Self::Logger(error) => Some(error),
        }
    }
}
