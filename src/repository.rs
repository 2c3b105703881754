/// Logger repository handles and lifecycle notifications
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Observer for repository lifecycle events.
///
/// The plugin registry subscribes so that resetting or shutting down a
/// repository tears down the plugins attached to it.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryListener: Send + Sync {
    /// The repository's configuration was reset.
    fn configuration_reset(&self, repository: &LoggerRepository);

    /// The repository is shutting down.
    fn repository_shutdown(&self, repository: &LoggerRepository);
}

struct RepositoryInner {
    name: String,
    listeners: Mutex<Vec<Weak<dyn RepositoryListener>>>,
}

/// An isolated logging configuration domain.
///
/// This is an opaque, cheap-to-clone handle: clones refer to the same
/// repository, and equality is handle identity, never deep value. Plugins with
/// identical names running in different repositories are distinct and do not
/// conflict.
#[derive(Clone)]
pub struct LoggerRepository {
    inner: Arc<RepositoryInner>,
}

/// Copyable identity token for a repository, used to partition registry
/// tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepositoryId(usize);

impl LoggerRepository {
    pub fn new(name: &str) -> Self {
        Self {
            inner: Arc::new(RepositoryInner {
                name: name.to_owned(),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn id(&self) -> RepositoryId {
        RepositoryId(Arc::as_ptr(&self.inner) as usize)
    }

    /// Subscribe to lifecycle events. Re-adding the same listener is a no-op.
    /// Dead listeners are dropped lazily at notification time.
    pub fn add_listener(&self, listener: Weak<dyn RepositoryListener>) {
        let Ok(mut listeners) = self.inner.listeners.lock() else {
            log::error!(
                "listener list of repository `{}` poisoned; dropping subscription",
                self.inner.name
            );
            return;
        };
        if listeners.iter().any(|known| known.ptr_eq(&listener)) {
            return;
        }
        listeners.push(listener);
    }

    /// Notify listeners that this repository's configuration was reset.
    pub fn reset_configuration(&self) {
        log::debug!("repository `{}`: configuration reset", self.inner.name);
        for listener in self.live_listeners() {
            listener.configuration_reset(self);
        }
    }

    /// Notify listeners that this repository is shutting down.
    pub fn shutdown(&self) {
        log::debug!("repository `{}`: shutdown", self.inner.name);
        for listener in self.live_listeners() {
            listener.repository_shutdown(self);
        }
    }

    // Snapshot outside the lock so listener callbacks can freely call back
    // into this repository.
    fn live_listeners(&self) -> Vec<Arc<dyn RepositoryListener>> {
        let Ok(mut listeners) = self.inner.listeners.lock() else {
            log::error!(
                "listener list of repository `{}` poisoned; skipping notification",
                self.inner.name
            );
            return Vec::new();
        };
        listeners.retain(|listener| listener.strong_count() > 0);
        listeners.iter().filter_map(Weak::upgrade).collect()
    }
}

impl PartialEq for LoggerRepository {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for LoggerRepository {}

impl fmt::Debug for LoggerRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRepository")
            .field("name", &self.inner.name)
            .field("id", &self.id())
            .finish()
    }
}
