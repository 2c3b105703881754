mod _traits;
mod identity;
mod registry;
mod state;
mod stop_reason;

// Re-exporting all public structures
pub use _traits::plugin::Plugin;
pub use identity::{plugins_match, PluginKey};
pub use registry::{PluginError, PluginRegistry};
pub use state::PluginState;
pub use stop_reason::StopReason;
