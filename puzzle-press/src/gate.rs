//! Loading gate: at most one generation runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PressError, PressResult};

/// Shared loading flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoadingGate {
    busy: Arc<AtomicBool>,
}

impl LoadingGate {
    /// Create an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a generation is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Take the gate for one generation.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::Busy`] while another guard is alive.
    pub fn try_acquire(&self) -> PressResult<LoadingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PressError::Busy)?;
        tracing::debug!("Loading gate acquired");
        Ok(LoadingGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

/// Holds the gate; dropping it clears the loading flag.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct LoadingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        tracing::debug!("Loading gate released");
    }
}
