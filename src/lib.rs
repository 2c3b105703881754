#![forbid(unsafe_code)]

//! Logging runtime core: a repository-scoped plugin lifecycle registry and a
//! conversion-pattern layout engine.
//!
//! The [`plugin::PluginRegistry`] tracks auxiliary components (socket
//! receivers, management bridges, ...) per [`repository::LoggerRepository`],
//! with idempotent start/stop semantics and identity-based collapsing of
//! duplicate instances. The [`layout`] module parses conversion patterns such
//! as `"%-5p [%t] %c{1} - %m%n"` into immutable converter chains and renders
//! [`event::LogEvent`]s through them.
//!
//! ```
//! use logchain::prelude::*;
//!
//! let layout = PatternLayout::new("%-5p %c{1} - %m%n");
//! let event = LogEvent::new("app.server.Gateway", Level::Info, "listening");
//! let line = layout.format(&event);
//! assert!(line.starts_with("INFO  Gateway - listening"));
//! ```

pub mod event;
pub mod layout;
pub mod plugin;
pub mod repository;

///
/// Expose all structures required by virtually any consumer of the runtime
///
/// ```
/// use logchain::prelude::*;
/// ```
pub mod prelude {
    pub use crate::event::{Level, LocationInfo, LogEvent};
    pub use crate::layout::{Layout, LayoutFeatures, PatternLayout};
    pub use crate::plugin::{Plugin, PluginError, PluginRegistry, PluginState};
    pub use crate::repository::LoggerRepository;
}
