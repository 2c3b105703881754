/// Repository-scoped plugin lifecycle registry
use crate::plugin::identity::{plugins_match, PluginKey};
use crate::plugin::stop_reason::StopReason;
use crate::plugin::Plugin;
use crate::repository::{LoggerRepository, RepositoryId, RepositoryListener};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;

/// A plugin collaborator's activation or shutdown contract failed.
///
/// Requested-state-already-holds cases are never errors; they are reported as
/// defined no-op return values instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("failed to activate plugin `{name}`: {reason}")]
    Activation { name: String, reason: String },

    #[error("failed to shut down plugin `{name}`: {reason}")]
    Shutdown { name: String, reason: String },
}

struct RepositorySlot {
    repository: LoggerRepository,
    plugins: HashMap<PluginKey, Arc<dyn Plugin>>,
}

type Table = HashMap<RepositoryId, RepositorySlot>;

struct RegistryInner {
    default_repository: LoggerRepository,
    table: Mutex<Table>,
}

/// Tracks the running plugins of one or more logger repositories.
///
/// The table is partitioned by repository: plugins with identical type and
/// name running in different repositories are distinct and never conflict.
/// Within one repository a (type, name) identity maps to at most one running
/// instance, and starting an equal instance hands back the one already
/// running instead of activating the newcomer.
///
/// Construct one registry per process (or per test) and pass it where it is
/// needed; there is no ambient global instance. Clones share the same table.
///
/// The registry subscribes itself to every repository it touches and reacts
/// to configuration resets and repository shutdowns by stopping that
/// repository's plugins.
///
/// All operations serialize on the table lock, and plugin activation/shutdown
/// contracts run under it; see [`Plugin`] for the no-reentrancy requirement
/// this puts on implementations.
#[derive(Clone)]
pub struct PluginRegistry {
    inner: Arc<RegistryInner>,
}

impl PluginRegistry {
    pub fn new(default_repository: LoggerRepository) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                default_repository,
                table: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn default_repository(&self) -> &LoggerRepository {
        &self.inner.default_repository
    }

    /// Start `plugin` in the default repository. See [`start_plugin_in`].
    ///
    /// [`start_plugin_in`]: PluginRegistry::start_plugin_in
    pub fn start_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<Arc<dyn Plugin>, PluginError> {
        let repository = self.inner.default_repository.clone();
        self.start_plugin_in(plugin, &repository)
    }

    /// Start `plugin` in `repository` and return the instance that is running
    /// afterwards.
    ///
    /// - Already active there: no-op, returns `plugin` unchanged.
    /// - An equal plugin (same type and name) is already running there: the
    ///   running instance is returned and `plugin` stays untouched and
    ///   unregistered.
    /// - Active in a *different* repository: it is stopped there first; a
    ///   plugin is active in at most one repository at a time.
    /// - Otherwise the plugin is registered, associated with `repository`,
    ///   and activated. An activation failure removes the registration again
    ///   and propagates.
    pub fn start_plugin_in(
        &self,
        plugin: Arc<dyn Plugin>,
        repository: &LoggerRepository,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let mut table = self.inner.lock_table();
        let name = plugin.name();

        if plugin.is_active() && plugin.repository().as_ref() == Some(repository) {
            log::debug!(
                "plugin `{name}` is already active in repository `{}`; nothing to do",
                repository.name()
            );
            return Ok(plugin);
        }

        let key = PluginKey::of(plugin.as_ref());
        if let Some(existing) = table
            .get(&repository.id())
            .and_then(|slot| slot.plugins.get(&key))
        {
            if !Arc::ptr_eq(existing, &plugin) {
                if existing.is_active() {
                    log::debug!(
                        "an equal plugin `{name}` is already running in repository `{}`; \
                         returning the running instance",
                        repository.name()
                    );
                    return Ok(Arc::clone(existing));
                }
                // Present-but-inactive violates the table invariant.
                log::warn!(
                    "registered plugin `{name}` in repository `{}` is unexpectedly inactive; \
                     replacing it",
                    repository.name()
                );
            }
        }

        if plugin.is_active() {
            if let Some(previous) = plugin.repository() {
                if previous != *repository {
                    log::debug!(
                        "plugin `{name}` is active in repository `{}`; stopping it there first",
                        previous.name()
                    );
                    if let Some(slot) = table.get_mut(&previous.id()) {
                        if slot.plugins.remove(&key).is_none() {
                            // Renamed since it was stored; fall back to
                            // object identity.
                            slot.plugins
                                .retain(|_, stored| !Arc::ptr_eq(stored, &plugin));
                        }
                    }
                    finish_stop(&plugin, StopReason::Moved)?;
                }
            }
        }

        self.subscribe(repository);
        let slot = table
            .entry(repository.id())
            .or_insert_with(|| RepositorySlot {
                repository: repository.clone(),
                plugins: HashMap::new(),
            });
        slot.plugins.insert(key.clone(), Arc::clone(&plugin));
        plugin.set_repository(Some(repository.clone()));

        match plugin.activate() {
            Ok(true) => {
                log::info!(
                    "started plugin `{name}` in repository `{}`",
                    repository.name()
                );
            }
            Ok(false) => {
                log::debug!(
                    "plugin `{name}` reported itself already active while starting in \
                     repository `{}`",
                    repository.name()
                );
            }
            Err(reason) => {
                if let Some(slot) = table.get_mut(&repository.id()) {
                    slot.plugins.remove(&key);
                }
                plugin.set_repository(None);
                return Err(PluginError::Activation { name, reason });
            }
        }
        Ok(plugin)
    }

    /// Stop a plugin in the repository it is currently attached to. A plugin
    /// that is attached nowhere, or whose repository no longer tracks an
    /// equal plugin, is a benign no-op reported as `Ok(None)`.
    pub fn stop_plugin(
        &self,
        plugin: &Arc<dyn Plugin>,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginError> {
        let Some(repository) = plugin.repository() else {
            log::debug!(
                "plugin `{}` is not attached to any repository; nothing to stop",
                plugin.name()
            );
            return Ok(None);
        };
        self.stop_plugin_in(plugin, &repository)
    }

    /// Stop the entry of `repository` matching `plugin` under the full
    /// identity rule (type, name, and repository association). Returns the
    /// stored instance that was stopped, or `Ok(None)` if nothing matched.
    pub fn stop_plugin_in(
        &self,
        plugin: &Arc<dyn Plugin>,
        repository: &LoggerRepository,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginError> {
        let mut table = self.inner.lock_table();
        let Some(slot) = table.get_mut(&repository.id()) else {
            log::debug!(
                "repository `{}` has no registered plugins; nothing to stop",
                repository.name()
            );
            return Ok(None);
        };

        let key = PluginKey::of(plugin.as_ref());
        let matches = slot
            .plugins
            .get(&key)
            .is_some_and(|stored| plugins_match(stored.as_ref(), plugin.as_ref()));
        if !matches {
            log::debug!(
                "no plugin equal to `{}` registered in repository `{}`",
                plugin.name(),
                repository.name()
            );
            return Ok(None);
        }
        let Some(stored) = slot.plugins.remove(&key) else {
            return Ok(None);
        };
        finish_stop(&stored, StopReason::Explicit)?;
        Ok(Some(stored))
    }

    /// Stop the first plugin named `name` in the default repository.
    pub fn stop_plugin_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginError> {
        let repository = self.inner.default_repository.clone();
        self.stop_plugin_by_name_in(name, &repository)
    }

    /// Stop the first plugin named `name` in `repository`, matching by name
    /// only. At most one plugin per name per repository is expected, but this
    /// operation does not enforce that; it stops the first match it finds.
    pub fn stop_plugin_by_name_in(
        &self,
        name: &str,
        repository: &LoggerRepository,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginError> {
        let mut table = self.inner.lock_table();
        let Some(slot) = table.get_mut(&repository.id()) else {
            log::debug!(
                "repository `{}` has no registered plugins; nothing to stop",
                repository.name()
            );
            return Ok(None);
        };
        let Some(key) = slot
            .plugins
            .keys()
            .find(|key| key.name() == name)
            .cloned()
        else {
            log::debug!(
                "no plugin named `{name}` registered in repository `{}`",
                repository.name()
            );
            return Ok(None);
        };
        let Some(stored) = slot.plugins.remove(&key) else {
            return Ok(None);
        };
        finish_stop(&stored, StopReason::ByName)?;
        Ok(Some(stored))
    }

    /// Stop every plugin in every known repository. Best-effort: each plugin
    /// receives exactly one shutdown invocation, failures are logged and do
    /// not abort the sweep, and every table entry is removed regardless.
    /// Returns the number of plugins swept.
    pub fn stop_all(&self) -> usize {
        let mut table = self.inner.lock_table();
        let mut stopped = 0;
        for slot in table.values_mut() {
            stopped += drain_slot(slot, StopReason::Bulk);
        }
        if stopped > 0 {
            log::info!("stopped {stopped} plugin(s) across all repositories");
        }
        stopped
    }

    /// Stop every plugin in `repository` only, with the same best-effort
    /// semantics as [`stop_all`](PluginRegistry::stop_all). Other
    /// repositories are untouched.
    pub fn stop_all_in(&self, repository: &LoggerRepository) -> usize {
        let mut table = self.inner.lock_table();
        let Some(slot) = table.get_mut(&repository.id()) else {
            return 0;
        };
        let stopped = drain_slot(slot, StopReason::Bulk);
        if stopped > 0 {
            log::info!(
                "stopped {stopped} plugin(s) in repository `{}`",
                repository.name()
            );
        }
        stopped
    }

    /// Number of plugins currently registered in `repository`.
    pub fn plugin_count_in(&self, repository: &LoggerRepository) -> usize {
        self.inner
            .lock_table()
            .get(&repository.id())
            .map(|slot| slot.plugins.len())
            .unwrap_or(0)
    }

    fn subscribe(&self, repository: &LoggerRepository) {
        let listener: Arc<dyn RepositoryListener> = self.inner.clone();
        let listener: Weak<dyn RepositoryListener> = Arc::downgrade(&listener);
        repository.add_listener(listener);
    }
}

impl RegistryInner {
    fn lock_table(&self) -> MutexGuard<'_, Table> {
        // A poisoned lock still guards a structurally valid table.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RepositoryListener for RegistryInner {
    fn configuration_reset(&self, repository: &LoggerRepository) {
        let mut table = self.lock_table();
        let Some(slot) = table.get_mut(&repository.id()) else {
            return;
        };
        let stopped = drain_slot(slot, StopReason::ConfigurationReset);
        if stopped > 0 {
            log::info!(
                "configuration reset of repository `{}` stopped {stopped} plugin(s)",
                repository.name()
            );
        }
    }

    fn repository_shutdown(&self, repository: &LoggerRepository) {
        let mut table = self.lock_table();
        let Some(mut slot) = table.remove(&repository.id()) else {
            return;
        };
        let stopped = drain_slot(&mut slot, StopReason::RepositoryShutdown);
        if stopped > 0 {
            log::info!(
                "shutdown of repository `{}` stopped {stopped} plugin(s)",
                repository.name()
            );
        }
    }
}

/// Invoke the shutdown contract and clear the repository association. The
/// association is cleared even when the contract fails, so a failed plugin
/// never lingers looking attached.
fn finish_stop(plugin: &Arc<dyn Plugin>, reason: StopReason) -> Result<bool, PluginError> {
    let name = plugin.name();
    let result = plugin.shutdown();
    plugin.set_repository(None);
    match result {
        Ok(true) => {
            log::info!("plugin `{name}`: {reason}");
            Ok(true)
        }
        Ok(false) => {
            log::debug!("plugin `{name}` was already inactive ({reason})");
            Ok(false)
        }
        Err(reason_text) => Err(PluginError::Shutdown {
            name,
            reason: reason_text,
        }),
    }
}

fn drain_slot(slot: &mut RepositorySlot, reason: StopReason) -> usize {
    let repository_name = slot.repository.name().to_owned();
    let mut stopped = 0;
    for (_, plugin) in slot.plugins.drain() {
        stopped += 1;
        if let Err(error) = finish_stop(&plugin, reason) {
            log::warn!("{error}; continuing {reason} of repository `{repository_name}`");
        }
    }
    stopped
}
