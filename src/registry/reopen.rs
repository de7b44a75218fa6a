//! Rotation trigger plumbing and the reopen coordinator
//!
//! The trigger is an explicit subscription object created when the
//! registry is configured, not an ambient process-wide signal table: the
//! registry holds the sender side, and the subscription returned from
//! construction carries the receiver the coordinator blocks on. A second
//! channel carries the shutdown request so the loop can be ended cleanly.

use super::StreamRegistry;
use crate::core::timestamp::utc_stamp;
use crate::core::{RegistryError, Result};
use crossbeam_channel::{bounded, select, Receiver, Sender};

/// Handle for firing a rotation trigger
///
/// Clonable; hosts wire it to whatever delivers their rotation events
/// (see [`crate::signal::forward_sigusr2`] for the conventional SIGUSR2
/// wiring on Unix).
#[derive(Clone)]
pub struct RotationTrigger {
    tx: Sender<()>,
}

impl RotationTrigger {
    /// Fire one rotation trigger
    ///
    /// The channel holds at most one pending trigger, so triggers arriving
    /// while a pass is already queued or running coalesce. Returns `false`
    /// when the trigger was coalesced into an already pending one.
    pub fn fire(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

/// Receiver bundle handed to [`StreamRegistry::run_reopen_loop`]
///
/// Clonable so an idempotent re-promotion can hand out the same
/// subscription again.
#[derive(Clone)]
pub struct RotationSubscription {
    pub(crate) triggers: Receiver<()>,
    pub(crate) shutdown: Receiver<()>,
}

/// Channel set owned by a configured registry
pub(crate) struct Channels {
    trigger_tx: Sender<()>,
    trigger_rx: Receiver<()>,
    shutdown_tx: Sender<()>,
    shutdown_rx: Receiver<()>,
}

impl Channels {
    pub(crate) fn new() -> Self {
        // Depth 1 on the trigger side coalesces overlapping triggers,
        // matching buffered signal-channel delivery.
        let (trigger_tx, trigger_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded(1);
        Self {
            trigger_tx,
            trigger_rx,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub(crate) fn subscription(&self) -> RotationSubscription {
        RotationSubscription {
            triggers: self.trigger_rx.clone(),
            shutdown: self.shutdown_rx.clone(),
        }
    }

    pub(crate) fn trigger(&self) -> RotationTrigger {
        RotationTrigger {
            tx: self.trigger_tx.clone(),
        }
    }

    pub(crate) fn send_shutdown(&self) {
        // One pending shutdown is enough.
        let _ = self.shutdown_tx.try_send(());
    }
}

impl StreamRegistry {
    /// Wait for rotation triggers and reopen all registered streams on
    /// each one
    ///
    /// Meant to run on its own thread. Blocks on the subscription until a
    /// trigger arrives, then runs one [`reopen_pass`](Self::reopen_pass)
    /// with `ignore_prefix`; a failed pass is reported through `on_abort`
    /// and the loop keeps waiting for the next trigger. Returns when
    /// [`shutdown_reopen_loop`](Self::shutdown_reopen_loop) is called or
    /// every trigger sender is gone.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use logmux::{LogLevel, StreamRegistry};
    ///
    /// let (registry, subscription) = StreamRegistry::new("/var/log/app");
    /// registry.open("api", LogLevel::Info).unwrap();
    ///
    /// std::thread::scope(|s| {
    ///     s.spawn(|| {
    ///         registry.run_reopen_loop(subscription, "", |e| {
    ///             eprintln!("rotation pass aborted: {}", e);
    ///         });
    ///     });
    ///     registry.trigger().unwrap().fire();
    ///     registry.shutdown_reopen_loop();
    /// });
    /// ```
    pub fn run_reopen_loop<F>(
        &self,
        subscription: RotationSubscription,
        ignore_prefix: &str,
        on_abort: F,
    ) where
        F: Fn(RegistryError),
    {
        loop {
            select! {
                recv(subscription.triggers) -> msg => {
                    if msg.is_err() {
                        return;
                    }
                    if let Err(e) = self.reopen_pass(ignore_prefix) {
                        on_abort(e);
                    }
                }
                recv(subscription.shutdown) -> _ => return,
            }
        }
    }

    /// Run one rotation pass over all registered streams
    ///
    /// Holds the exclusive lock for the entire pass. Streams whose name
    /// starts with a non-empty `ignore_prefix` are skipped outright. Every
    /// other stream has its writer reopened, followed by one rotation
    /// marker at forced informational visibility with the stream's filter
    /// level restored afterward.
    ///
    /// # Errors
    ///
    /// The first failed reopen aborts the pass with
    /// [`RegistryError::Reopen`]; streams not yet visited keep their
    /// pre-rotation descriptors until the next trigger. Fail fast is
    /// deliberate here, not best-effort completion.
    pub fn reopen_pass(&self, ignore_prefix: &str) -> Result<()> {
        self.for_each_stream(|name, entry| {
            if !ignore_prefix.is_empty() && name.starts_with(ignore_prefix) {
                return Ok(());
            }

            entry.writer().reopen().map_err(|e| {
                RegistryError::reopen(entry.writer().path().display().to_string(), e)
            })?;

            entry.logger().force_info(format!(
                "Reopened log stream `{}` for rotation at {}",
                name,
                utc_stamp()
            ));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_coalescing() {
        let channels = Channels::new();
        let trigger = channels.trigger();

        assert!(trigger.fire());
        // Nothing consumed the first trigger yet, so the second coalesces.
        assert!(!trigger.fire());

        let subscription = channels.subscription();
        subscription.triggers.recv().unwrap();
        assert!(trigger.fire());
    }

    #[test]
    fn test_subscription_clones_share_channel() {
        let channels = Channels::new();
        let a = channels.subscription();
        let b = a.clone();

        channels.trigger().fire();
        b.triggers.recv().unwrap();
        // The trigger was consumed through the clone; none left for `a`.
        assert!(a.triggers.try_recv().is_err());
    }

    #[test]
    fn test_shutdown_send_never_blocks() {
        let channels = Channels::new();
        channels.send_shutdown();
        channels.send_shutdown();
        let subscription = channels.subscription();
        subscription.shutdown.recv().unwrap();
    }
}
