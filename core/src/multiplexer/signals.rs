//! Termination signals observed while a session is alive.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::SigId;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

use crate::error::{FleetError, Result};

const SIGNALS: [i32; 3] = [SIGINT, SIGTERM, SIGHUP];

/// Turns SIGINT, SIGTERM and SIGHUP into a flag instead of ending the process.
///
/// The handlers are unregistered when the guard is dropped.
pub struct SignalGuard {
    flag: Arc<AtomicBool>,
    ids: Vec<SigId>,
}

impl SignalGuard {
    pub fn install() -> Result<Self> {
        let mut guard = Self {
            flag: Arc::new(AtomicBool::new(false)),
            ids: Vec::with_capacity(SIGNALS.len()),
        };
        for signal in SIGNALS {
            let id = signal_hook::flag::register(signal, Arc::clone(&guard.flag)).map_err(FleetError::Signal)?;
            guard.ids.push(id);
        }
        Ok(guard)
    }

    pub fn flag(&self) -> &AtomicBool {
        &self.flag
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// [`FleetError::Interrupted`] once `flag` is set.
pub fn check(flag: &AtomicBool) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        Err(FleetError::Interrupted)
    } else {
        Ok(())
    }
}
