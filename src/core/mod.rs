//! Core logger types and traits

pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod sink;
pub mod timestamp;

pub use error::{RegistryError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::StreamLogger;
pub use sink::{LogSink, RotatableSink};
pub use timestamp::{utc_stamp, TimestampFormat};
