//! Shared handle to the dashboard state container.

use scout_core::DashboardState;
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe wrapper so spawned operations can apply transitions.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Mutex<DashboardState>>,
}

impl SharedState {
    pub fn new(state: DashboardState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply one transition.
    pub fn update<R>(&self, transition: impl FnOnce(&mut DashboardState) -> R) -> R {
        transition(&mut self.lock())
    }

    pub fn read<R>(&self, view: impl FnOnce(&DashboardState) -> R) -> R {
        view(&self.lock())
    }

    pub fn snapshot(&self) -> DashboardState {
        self.lock().clone()
    }
}
