//! Sink traits for log output destinations

use std::io;
use std::path::Path;

/// A line-oriented, internally synchronized byte sink
///
/// Implementations take `&self` and synchronize internally so a sink can be
/// shared between a logger and the registry's writer handle.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;
}

/// A [`LogSink`] whose underlying descriptor can be reacquired in place
///
/// External rotation tooling renames the file out from under the sink;
/// `reopen` then opens a fresh descriptor at [`path`](RotatableSink::path)
/// and swaps it in without losing concurrent writes.
pub trait RotatableSink: LogSink {
    fn reopen(&self) -> io::Result<()>;
    fn path(&self) -> &Path;
}
