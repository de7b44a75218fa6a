//! Sink implementations

pub mod file;
pub mod stderr;

pub use file::FileWriter;
pub use stderr::StderrSink;

// Re-export the trait seams alongside the implementations
pub use crate::core::{LogSink, RotatableSink};
