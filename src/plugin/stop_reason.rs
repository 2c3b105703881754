/// Why a plugin is being stopped.
///
/// Carried through the registry's internal stop paths so diagnostic output
/// distinguishes an explicit stop from a repository-driven teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// A caller stopped this specific plugin instance.
    #[default]
    Explicit,

    /// A caller stopped the plugin by name.
    ByName,

    /// The plugin was swept up by a bulk stop of its repository or of every
    /// repository.
    Bulk,

    /// The owning repository's configuration was reset.
    ConfigurationReset,

    /// The owning repository is shutting down.
    RepositoryShutdown,

    /// The plugin is being restarted in a different repository; it is stopped
    /// in its old home first.
    Moved,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Explicit => write!(f, "stopped explicitly"),
            StopReason::ByName => write!(f, "stopped by name"),
            StopReason::Bulk => write!(f, "bulk stop"),
            StopReason::ConfigurationReset => write!(f, "configuration reset"),
            StopReason::RepositoryShutdown => write!(f, "repository shutdown"),
            StopReason::Moved => write!(f, "moved to another repository"),
        }
    }
}
