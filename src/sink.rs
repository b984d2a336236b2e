//! Destinations for emitted log lines.
//!
//! The collector reads the function's standard output, so [`StdoutSink`] is
//! what production code uses. [`MemorySink`] keeps lines in memory for tests.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::LoggerError;

/// Receives one complete log line per successful invocation.
///
/// Implementations must be `Send + Sync` so one wrapper can serve concurrent
/// invocations.
pub trait LogSink: Send + Sync {
    /// Writes `line` as a single line of output.
    fn emit(&self, line: &str) -> Result<(), LoggerError>;
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, line: &str) -> Result<(), LoggerError> {
        (**self).emit(line)
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn emit(&self, line: &str) -> Result<(), LoggerError> {
        (**self).emit(line)
    }
}

/// Writes lines to the process's standard output and flushes after each.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, line: &str) -> Result<(), LoggerError> {
        write_line(&mut std::io::stdout().lock(), line)
    }
}

/// Writes `line` and a newline to `out`, then flushes.
fn write_line<W: Write>(out: &mut W, line: &str) -> Result<(), LoggerError> {
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line emitted so far.
    ///
    /// A poisoned lock still yields the lines captured before the panic.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of lines emitted so far.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: &str) -> Result<(), LoggerError> {
        self.lines
            .lock()
            .map_err(|_| LoggerError::emit("memory sink lock poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}
