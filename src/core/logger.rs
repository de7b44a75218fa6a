//! Per-stream logger implementation

use super::{
    log_entry::LogEntry, log_level::LogLevel, sink::LogSink, timestamp::TimestampFormat,
};
use parking_lot::RwLock;
use std::io;
use std::sync::Arc;

/// Sink that discards everything, swapped in by [`StreamLogger::shutdown`]
struct NullSink;

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A level-filtered logger bound to one output sink
///
/// Every registered stream owns one `StreamLogger` writing through the same
/// underlying sink as the stream's writer handle. The level filter and the
/// output sink can both be changed at runtime through `&self`, so handles
/// can be shared freely behind an `Arc`.
pub struct StreamLogger {
    min_level: RwLock<LogLevel>,
    output: RwLock<Arc<dyn LogSink>>,
    timestamp_format: TimestampFormat,
}

impl StreamLogger {
    pub fn new(output: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self {
            min_level: RwLock::new(level),
            output: RwLock::new(output),
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Set the timestamp format for this logger
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if level < *self.min_level.read() {
            return;
        }

        let entry = LogEntry::new(level, message.into());
        let line = entry.render(&self.timestamp_format);

        // Clone the sink handle out of the lock so a slow write does not
        // block a concurrent set_output.
        let output = Arc::clone(&*self.output.read());
        if let Err(e) = output.write_line(&line) {
            eprintln!("[logmux] dropped log line: {}", e);
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Emit one informational line regardless of the configured level
    ///
    /// Saves the filter level, forces `Info`, logs, and restores the saved
    /// level. Used for the stream start and rotation marker lines, which
    /// must be visible even on streams filtered to `Error` and above.
    pub fn force_info(&self, message: impl Into<String>) {
        let saved = *self.min_level.read();
        self.set_level(LogLevel::Info);
        self.info(message);
        self.set_level(saved);
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Swap the output sink, returning once all new lines route to it
    pub fn set_output(&self, output: Arc<dyn LogSink>) {
        *self.output.write() = output;
    }

    pub fn flush(&self) -> io::Result<()> {
        self.output.read().flush()
    }

    /// Flush and silence the logger
    ///
    /// Later log calls are discarded. Used when the bootstrap sentinel is
    /// retired at promotion time.
    pub fn shutdown(&self) {
        let _ = self.flush();
        self.set_output(Arc::new(NullSink));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct CaptureSink {
        lines: Mutex<Vec<String>>,
    }

    impl CaptureSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                lines: Mutex::new(Vec::new()),
            })
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }
    }

    impl LogSink for CaptureSink {
        fn write_line(&self, line: &str) -> io::Result<()> {
            self.lines.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_filtering() {
        let sink = CaptureSink::new();
        let logger = StreamLogger::new(sink.clone(), LogLevel::Warn);

        logger.info("filtered out");
        logger.warn("kept");
        logger.error("also kept");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("kept"));
    }

    #[test]
    fn test_force_info_restores_level() {
        let sink = CaptureSink::new();
        let logger = StreamLogger::new(sink.clone(), LogLevel::Error);

        logger.force_info("rotation marker");

        assert_eq!(logger.level(), LogLevel::Error);
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[INFO ]"));
        assert!(lines[0].contains("rotation marker"));
    }

    #[test]
    fn test_set_output_redirects() {
        let first = CaptureSink::new();
        let second = CaptureSink::new();
        let logger = StreamLogger::new(first.clone(), LogLevel::Info);

        logger.info("to first");
        logger.set_output(second.clone());
        logger.info("to second");

        assert_eq!(first.lines().len(), 1);
        assert_eq!(second.lines().len(), 1);
        assert!(second.lines()[0].contains("to second"));
    }

    #[test]
    fn test_shutdown_silences() {
        let sink = CaptureSink::new();
        let logger = StreamLogger::new(sink.clone(), LogLevel::Trace);

        logger.info("before shutdown");
        logger.shutdown();
        logger.fatal("after shutdown");

        assert_eq!(sink.lines().len(), 1);
    }
}
