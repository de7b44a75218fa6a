//! # logmux
//!
//! A registry of named, rotatable log streams with signal-driven file
//! reopen support.
//!
//! ## Features
//!
//! - **Named Streams**: Each stream gets its own file, logger, and filter level
//! - **Safe Reopen**: One rotation trigger reopens every registered stream
//!   atomically, with fail-fast abort reporting on partial failure
//! - **Two-Phase Bootstrap**: Log to standard error before the log directory
//!   is known, then promote in place
//! - **Thread Safe**: Designed for concurrent environments
//!
//! ## Quick start
//!
//! ```no_run
//! use logmux::{LogLevel, StreamRegistry};
//!
//! let (registry, subscription) = StreamRegistry::new("/var/log/myapp");
//! registry.open("api", LogLevel::Info).unwrap();
//! registry.open("worker", LogLevel::Debug).unwrap();
//!
//! registry.logger("api").unwrap().info("listening on :8080");
//! ```

pub mod core;
pub mod registry;
#[cfg(unix)]
pub mod signal;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        LogEntry, LogLevel, LogSink, RegistryError, Result, RotatableSink, StreamLogger,
        TimestampFormat,
    };
    pub use crate::registry::reopen::{RotationSubscription, RotationTrigger};
    pub use crate::registry::{StreamEntry, StreamRegistry, EARLY_STREAM};
    pub use crate::sinks::{FileWriter, StderrSink};
}

pub use crate::core::{
    LogEntry, LogLevel, LogSink, RegistryError, Result, RotatableSink, StreamLogger,
    TimestampFormat,
};
pub use crate::registry::reopen::{RotationSubscription, RotationTrigger};
pub use crate::registry::{StreamEntry, StreamRegistry, EARLY_STREAM};
pub use crate::sinks::{FileWriter, StderrSink};
