use crate::repository::LoggerRepository;
use std::any::Any;

/// Capability interface for auxiliary components with an explicit start/stop
/// lifecycle (socket receivers, management bridges, watchdogs, ...).
///
/// The registry operates purely through this interface; what a plugin
/// actually does while active is irrelevant to lifecycle handling. Most
/// implementations embed a [`PluginState`](crate::plugin::PluginState) for
/// the name/repository/active bookkeeping and add their own resources on top.
///
/// Activation and shutdown are compare-and-set transitions: the plugin itself
/// must detect "already in the requested state" and report `Ok(false)` for it
/// rather than failing or repeating side effects. `Err` is reserved for real
/// collaborator failures (a socket that cannot bind, a thread that will not
/// join) and propagates out of the registry operation that triggered it.
///
/// These contracts are invoked while the registry holds its table lock, so
/// they must not call back into the registry.
///
/// # Example
///
/// ```
/// use logchain::plugin::{Plugin, PluginState};
/// use logchain::repository::LoggerRepository;
/// use std::any::Any;
///
/// struct SocketReceiver {
///     state: PluginState,
/// }
///
/// impl SocketReceiver {
///     fn new(name: &str) -> Self {
///         Self { state: PluginState::new(name) }
///     }
/// }
///
/// impl Plugin for SocketReceiver {
///     fn name(&self) -> String {
///         self.state.name()
///     }
///
///     fn set_name(&self, name: &str) {
///         self.state.set_name(name);
///     }
///
///     fn repository(&self) -> Option<LoggerRepository> {
///         self.state.repository()
///     }
///
///     fn set_repository(&self, repository: Option<LoggerRepository>) {
///         self.state.set_repository(repository);
///     }
///
///     fn is_active(&self) -> bool {
///         self.state.is_active()
///     }
///
///     fn activate(&self) -> Result<bool, String> {
///         // Bind sockets etc. only when the transition actually happens.
///         Ok(self.state.try_activate())
///     }
///
///     fn shutdown(&self) -> Result<bool, String> {
///         Ok(self.state.try_shutdown())
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let receiver = SocketReceiver::new("socket-receiver");
/// assert!(!receiver.is_active());
/// assert!(receiver.activate().unwrap_or(false));
/// ```
pub trait Plugin: Send + Sync {
    /// The plugin's name. Mutable before and after registration; the registry
    /// captures it at start time for table keying.
    fn name(&self) -> String;

    fn set_name(&self, name: &str);

    /// The repository this plugin is currently attached to, if any. Set by
    /// the registry on successful start, cleared on stop.
    fn repository(&self) -> Option<LoggerRepository>;

    fn set_repository(&self, repository: Option<LoggerRepository>);

    fn is_active(&self) -> bool;

    /// Activate the plugin. `Ok(true)` iff the inactive-to-active transition
    /// happened in this call; activating an already-active plugin is a safe
    /// no-op reported as `Ok(false)`.
    fn activate(&self) -> Result<bool, String>;

    /// Shut the plugin down. `Ok(true)` iff the active-to-inactive transition
    /// happened in this call; shutting down an inactive plugin is a safe
    /// no-op reported as `Ok(false)`.
    fn shutdown(&self) -> Result<bool, String>;

    /// Concrete-type access for identity matching and downcasting.
    fn as_any(&self) -> &dyn Any;
}
