//! Registry of named, rotatable log streams
//!
//! A [`StreamRegistry`] maps stream names to their writer and logger
//! handles behind one reader/writer lock. It is built either fully
//! configured with [`StreamRegistry::new`], or in two phases with
//! [`StreamRegistry::bootstrap`] followed by [`StreamRegistry::promote`]
//! once the log directory is known. In the bootstrap phase a sentinel
//! logger targeting standard error carries early diagnostics.
//!
//! # Example
//!
//! ```no_run
//! use logmux::{LogLevel, StreamRegistry};
//!
//! let (registry, subscription) = StreamRegistry::new("/var/log/myapp");
//! registry.open("api", LogLevel::Info).unwrap();
//! registry.logger("api").unwrap().info("listening on :8080");
//!
//! std::thread::scope(|s| {
//!     s.spawn(|| {
//!         registry.run_reopen_loop(subscription, "audit_", |e| {
//!             eprintln!("rotation aborted: {}", e);
//!         });
//!     });
//!     // ... run the application, then:
//!     registry.shutdown_reopen_loop();
//! });
//! ```

pub mod reopen;

use crate::core::{LogLevel, RegistryError, Result, RotatableSink, StreamLogger};
use crate::core::timestamp::utc_stamp;
use crate::sinks::{FileWriter, StderrSink};
use parking_lot::RwLock;
use reopen::{Channels, RotationSubscription, RotationTrigger};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name reserved for the bootstrap sentinel logger
///
/// Kept reserved so hosts migrating from registries that stored the
/// sentinel in the stream map cannot collide with it.
pub const EARLY_STREAM: &str = "__early";

/// Suffix of every active stream file under the base path
const ACTIVE_SUFFIX: &str = ".log";

/// One registered stream: a rotatable writer and the logger bound to it
///
/// The logger writes through the same underlying sink as the writer
/// handle; neither is shared with any other entry.
pub struct StreamEntry {
    writer: Arc<dyn RotatableSink>,
    logger: Arc<StreamLogger>,
}

impl StreamEntry {
    pub fn writer(&self) -> &Arc<dyn RotatableSink> {
        &self.writer
    }

    pub fn logger(&self) -> &Arc<StreamLogger> {
        &self.logger
    }
}

/// Lifecycle state, tagged rather than flagged
///
/// The sentinel logger only exists in `Bootstrap`; the base path and the
/// trigger channels only exist in `Configured`. The transition happens at
/// most once and never reverts.
enum RegistryState {
    Bootstrap { early: Arc<StreamLogger> },
    Configured { base_path: PathBuf, channels: Channels },
}

struct Inner {
    entries: HashMap<String, StreamEntry>,
    state: RegistryState,
}

/// Concurrent name → stream map with a signal-driven reopen protocol
pub struct StreamRegistry {
    inner: RwLock<Inner>,
}

impl StreamRegistry {
    /// Create a fully configured registry rooted at `base_path`
    ///
    /// Returns the registry together with the rotation subscription to
    /// hand to [`run_reopen_loop`](Self::run_reopen_loop).
    pub fn new(base_path: impl Into<PathBuf>) -> (Self, RotationSubscription) {
        let channels = Channels::new();
        let subscription = channels.subscription();
        let registry = Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                state: RegistryState::Configured {
                    base_path: base_path.into(),
                    channels,
                },
            }),
        };
        (registry, subscription)
    }

    /// Create a bare registry usable before the log directory is known
    ///
    /// The registry starts with a sentinel logger to standard error at the
    /// most verbose level. Upgrade it with [`promote`](Self::promote).
    pub fn bootstrap() -> Self {
        let early = Arc::new(StreamLogger::new(
            Arc::new(StderrSink::new()),
            LogLevel::Trace,
        ));
        early.info(format!("Started early logging at {}", utc_stamp()));

        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                state: RegistryState::Bootstrap { early },
            }),
        }
    }

    /// Upgrade a bootstrapped registry into a configured one
    ///
    /// Idempotent: once configured, later calls return a clone of the
    /// existing subscription and change nothing, including the base path.
    /// On the first call the sentinel logger is shut down and removed.
    pub fn promote(&self, base_path: impl Into<PathBuf>) -> RotationSubscription {
        let mut inner = self.inner.write();

        if let RegistryState::Configured { channels, .. } = &inner.state {
            return channels.subscription();
        }

        if let RegistryState::Bootstrap { early } = &inner.state {
            early.shutdown();
        }

        let channels = Channels::new();
        let subscription = channels.subscription();
        inner.state = RegistryState::Configured {
            base_path: base_path.into(),
            channels,
        };
        subscription
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.inner.read().state, RegistryState::Configured { .. })
    }

    /// Base path of a configured registry, `None` while bootstrapped
    pub fn base_path(&self) -> Option<PathBuf> {
        match &self.inner.read().state {
            RegistryState::Configured { base_path, .. } => Some(base_path.clone()),
            RegistryState::Bootstrap { .. } => None,
        }
    }

    /// Log through the sentinel logger; no-op once configured
    pub fn early_log(&self, message: impl Into<String>) {
        if let RegistryState::Bootstrap { early } = &self.inner.read().state {
            early.info(message);
        }
    }

    /// Log at fatal severity through the sentinel logger; no-op once
    /// configured
    ///
    /// Does not terminate the process. Whether a fatal condition exits is
    /// the host's decision, not the registry's.
    pub fn early_fatal(&self, message: impl Into<String>) {
        if let RegistryState::Bootstrap { early } = &self.inner.read().state {
            early.fatal(message);
        }
    }

    /// Register a stream under `name`, replacing any previous entry
    ///
    /// The replaced writer and logger simply lose their registry
    /// reference; they are not closed.
    pub fn insert(
        &self,
        name: impl Into<String>,
        writer: Arc<dyn RotatableSink>,
        logger: Arc<StreamLogger>,
    ) {
        let mut inner = self.inner.write();
        inner.entries.insert(name.into(), StreamEntry { writer, logger });
    }

    /// Look up a stream's writer handle
    pub fn writer(&self, name: &str) -> Option<Arc<dyn RotatableSink>> {
        let inner = self.inner.read();
        inner.entries.get(name).map(|e| Arc::clone(&e.writer))
    }

    /// Look up a stream's logger handle
    ///
    /// The returned handle is mutable shared state (level, output sink),
    /// so the lookup takes the exclusive lock: it orders against an
    /// in-flight rotation pass instead of racing its level save/restore.
    pub fn logger(&self, name: &str) -> Option<Arc<StreamLogger>> {
        let inner = self.inner.write();
        inner.entries.get(name).map(|e| Arc::clone(&e.logger))
    }

    /// Remove a stream, dropping its writer and logger handles together
    pub fn remove(&self, name: &str) {
        let mut inner = self.inner.write();
        inner.entries.remove(name);
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Names of all registered streams, in no particular order
    pub fn names(&self) -> Vec<String> {
        self.inner.read().entries.keys().cloned().collect()
    }

    /// Visit every entry under the exclusive lock
    ///
    /// The lock is held across the entire visit and released on every exit
    /// path, including an early abort through the visitor's error. No
    /// insert, removal, or logger lookup can interleave with the visit.
    /// Iteration order is unspecified.
    pub fn for_each_stream<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &StreamEntry) -> Result<()>,
    {
        let inner = self.inner.write();
        for (name, entry) in &inner.entries {
            visit(name, entry)?;
        }
        Ok(())
    }

    /// Open a new stream named `name` backed by `<base_path>/<name>.log`
    ///
    /// Any pre-existing file at that path is first renamed aside to
    /// `<name>.log.<RFC 3339 UTC timestamp>` on a best-effort basis; a
    /// fresh writer is then created, wrapped in a logger filtered at
    /// `level`, announced with a start marker, and registered (replacing
    /// any previous entry of the same name).
    ///
    /// # Errors
    ///
    /// [`RegistryError::ReservedName`] for the sentinel name,
    /// [`RegistryError::NotConfigured`] before promotion, and
    /// [`RegistryError::OpenStream`] if the file cannot be created — in
    /// which case nothing is registered.
    pub fn open(&self, name: &str, level: LogLevel) -> Result<()> {
        if name == EARLY_STREAM {
            return Err(RegistryError::reserved(name));
        }
        let base_path = self
            .base_path()
            .ok_or_else(|| RegistryError::not_configured("open"))?;

        // File work happens outside the lock; only the final insert takes it.
        // The base path never changes once configured, so the early read is safe.
        let active = stream_path(&base_path, name);
        let stale = base_path.join(format!("{}{}.{}", name, ACTIVE_SUFFIX, utc_stamp()));

        // Move a stale file aside. Opportunistic preservation only: absence,
        // permissions, and rename races are all ignored.
        let _ = fs::rename(&active, &stale);

        let writer = Arc::new(FileWriter::create(&active)?);
        let logger = Arc::new(StreamLogger::new(
            Arc::clone(&writer) as Arc<dyn crate::core::LogSink>,
            level,
        ));
        logger.force_info(format!("Started log stream `{}` at {}", name, utc_stamp()));

        self.insert(name, writer, logger);
        Ok(())
    }

    /// Handle for firing rotation triggers, `None` while bootstrapped
    pub fn trigger(&self) -> Option<RotationTrigger> {
        match &self.inner.read().state {
            RegistryState::Configured { channels, .. } => Some(channels.trigger()),
            RegistryState::Bootstrap { .. } => None,
        }
    }

    /// Ask a running reopen loop to exit after its current pass
    pub fn shutdown_reopen_loop(&self) {
        if let RegistryState::Configured { channels, .. } = &self.inner.read().state {
            channels.send_shutdown();
        }
    }
}

/// Active file path for a stream name under a base path
fn stream_path(base_path: &Path, name: &str) -> PathBuf {
    base_path.join(format!("{}{}", name, ACTIVE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_starts_unconfigured() {
        let registry = StreamRegistry::bootstrap();
        assert!(!registry.is_configured());
        assert!(registry.base_path().is_none());
        assert!(registry.trigger().is_none());
    }

    #[test]
    fn test_promote_is_idempotent() {
        let registry = StreamRegistry::bootstrap();
        let _first = registry.promote("/var/log/app");
        let _second = registry.promote("/tmp/elsewhere");

        // The second promote keeps the original base path.
        assert_eq!(registry.base_path().unwrap(), PathBuf::from("/var/log/app"));
    }

    #[test]
    fn test_early_log_noop_after_promote() {
        let registry = StreamRegistry::bootstrap();
        registry.early_log("visible on stderr");
        registry.promote("/var/log/app");
        // Must not panic or log; the sentinel is gone.
        registry.early_log("silently dropped");
        registry.early_fatal("also dropped");
    }

    #[test]
    fn test_open_requires_configuration() {
        let registry = StreamRegistry::bootstrap();
        let err = registry.open("api", LogLevel::Info).unwrap_err();
        assert!(matches!(err, RegistryError::NotConfigured { .. }));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let (registry, _sub) = StreamRegistry::new("/var/log/app");
        let err = registry.open(EARLY_STREAM, LogLevel::Info).unwrap_err();
        assert!(matches!(err, RegistryError::ReservedName { .. }));
    }

    #[test]
    fn test_stream_path_layout() {
        assert_eq!(
            stream_path(Path::new("/var/log/app"), "api"),
            PathBuf::from("/var/log/app/api.log")
        );
    }
}
