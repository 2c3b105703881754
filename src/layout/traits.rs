/// Layout trait: how a log event becomes text
use crate::event::LogEvent;
use crate::layout::features::LayoutFeatures;

/// Renders log events as text for an output target.
///
/// A layout only reads from the event. Implementations must be shareable
/// across logging threads.
pub trait Layout: Send + Sync {
    /// Render one event. Must not mutate the event and must not fail; missing
    /// optional fields render as empty strings.
    fn format(&self, event: &LogEvent) -> String;

    /// MIME type of the rendered output.
    fn content_type(&self) -> &str {
        "text/plain"
    }

    /// Which expensive event fields this layout reads. Callers may skip
    /// capturing anything not advertised here.
    fn requires(&self) -> LayoutFeatures {
        LayoutFeatures::empty()
    }
}
