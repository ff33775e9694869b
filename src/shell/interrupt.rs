//! Ctrl-C handling.
//!
//! Ctrl-C sets a flag instead of killing the process. A running child
//! receives the same signal from the terminal and exits on its own; the
//! setup checks the flag after each external command and unwinds with
//! [`SetupError::Cancelled`](crate::SetupError::Cancelled).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::error::{Result, SetupError};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INSTALLED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

fn mark_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
fn register() -> std::result::Result<(), String> {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    extern "C" fn handler(_sig: libc::c_int) {
        mark_interrupted();
    }

    let action = SigAction::new(SigHandler::Handler(handler), SaFlags::empty(), SigSet::empty());
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(windows)]
fn register() -> std::result::Result<(), String> {
    ctrlc::set_handler(mark_interrupted).map_err(|e| e.to_string())
}

#[cfg(not(any(unix, windows)))]
fn register() -> std::result::Result<(), String> {
    Ok(())
}

/// Install the Ctrl-C handler. Later calls return the first call's result.
pub fn install_handler() -> Result<()> {
    INSTALLED
        .get_or_init(register)
        .clone()
        .map_err(|e| SetupError::Other(anyhow::anyhow!("Failed to register Ctrl-C handler: {}", e)))
}

/// Whether Ctrl-C was pressed.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
