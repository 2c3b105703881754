/// Plugin identity: what makes two plugin instances "the same"
use crate::plugin::Plugin;
use std::any::TypeId;

/// Table key for one plugin within a repository's partition: concrete type
/// plus name. The repository clause of the identity rule is supplied by the
/// partition the key lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey {
    type_id: TypeId,
    name: String,
}

impl PluginKey {
    /// Capture the plugin's identity as of now. Renaming the plugin later
    /// does not retroactively change keys already stored in a table.
    pub fn of(plugin: &dyn Plugin) -> Self {
        Self {
            type_id: plugin.as_any().type_id(),
            name: plugin.name(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Full identity comparison: same concrete type, same name, same current
/// repository (handle identity, never deep value). Used when matching a
/// caller-supplied instance against a stored one, where both sides carry
/// their own repository association; a plugin moved between repositories
/// mid-race can therefore never match a stranger.
pub fn plugins_match(a: &dyn Plugin, b: &dyn Plugin) -> bool {
    if a.as_any().type_id() != b.as_any().type_id() {
        log::debug!(
            "plugins `{}` and `{}` differ by concrete type",
            a.name(),
            b.name()
        );
        return false;
    }
    if a.name() != b.name() {
        log::debug!("plugins differ by name: `{}` != `{}`", a.name(), b.name());
        return false;
    }
    if a.repository() != b.repository() {
        log::debug!("plugin `{}`: repository association differs", a.name());
        return false;
    }
    true
}
