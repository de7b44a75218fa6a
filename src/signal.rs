//! SIGUSR2 forwarding for hosts that rotate logs by signal
//!
//! OS signal delivery stays outside the registry: the registry only knows
//! its trigger channel. This module provides the conventional wiring for
//! Unix hosts whose rotation tooling sends SIGUSR2 after renaming files.

use crate::registry::reopen::RotationTrigger;
use nix::sys::signal::{SigSet, Signal};
use std::io;
use std::thread::{self, JoinHandle};

/// Spawn a thread that fires `trigger` on every SIGUSR2 delivery
///
/// SIGUSR2 is blocked in the calling thread's mask and then waited on
/// synchronously from a dedicated thread. Call this before spawning other
/// threads — threads inherit the mask, and an unblocked thread elsewhere
/// could steal the delivery.
///
/// The thread runs for the life of the process; there is nothing to join.
///
/// # Errors
///
/// Returns an error if the signal mask cannot be installed or the thread
/// cannot be spawned.
pub fn forward_sigusr2(trigger: RotationTrigger) -> io::Result<JoinHandle<()>> {
    let mut mask = SigSet::empty();
    mask.add(Signal::SIGUSR2);
    mask.thread_block().map_err(io::Error::from)?;

    thread::Builder::new()
        .name("logmux-sigusr2".into())
        .spawn(move || loop {
            match mask.wait() {
                Ok(_) => {
                    trigger.fire();
                }
                // EINTR: retry the wait
                Err(nix::errno::Errno::EINTR) => continue,
                Err(_) => return,
            }
        })
}
