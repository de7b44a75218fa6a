//! Standard-error sink for the bootstrap sentinel logger

use crate::core::LogSink;
use std::io::{self, Write};

/// Sink writing to the process standard error
///
/// Used by the bootstrap sentinel logger so early diagnostics are visible
/// before the log directory is known.
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}
