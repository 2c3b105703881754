/// Reusable lifecycle bookkeeping for plugin implementations
use crate::repository::LoggerRepository;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// The name/repository/active bookkeeping every plugin needs.
///
/// Implementations of [`Plugin`](crate::plugin::Plugin) embed one of these and
/// delegate, instead of inheriting from a base class as the classic design
/// did. The active flag transitions through compare-and-set, so two threads
/// racing `try_activate` (or `try_shutdown`) agree on exactly one winner and
/// the loser sees a no-op.
#[derive(Debug)]
pub struct PluginState {
    name: Mutex<String>,
    repository: Mutex<Option<LoggerRepository>>,
    active: AtomicBool,
}

impl PluginState {
    pub fn new(name: &str) -> Self {
        Self {
            name: Mutex::new(name.to_owned()),
            repository: Mutex::new(None),
            active: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> String {
        // A poisoned lock still guards a valid name; keep going.
        self.name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_name(&self, name: &str) {
        *self.name.lock().unwrap_or_else(PoisonError::into_inner) = name.to_owned();
    }

    pub fn repository(&self) -> Option<LoggerRepository> {
        self.repository
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_repository(&self, repository: Option<LoggerRepository>) {
        *self
            .repository
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = repository;
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Transition inactive -> active. Returns whether the transition happened
    /// in this call.
    pub fn try_activate(&self) -> bool {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Transition active -> inactive. Returns whether the transition happened
    /// in this call.
    pub fn try_shutdown(&self) -> bool {
        self.active
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
