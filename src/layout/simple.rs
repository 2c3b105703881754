/// Minimal `LEVEL - message` layout
use crate::event::LogEvent;
use crate::layout::converter::LINE_SEPARATOR;
use crate::layout::traits::Layout;

/// Renders `LEVEL - message` followed by the line separator. Useful as a
/// predictable layout in tests and bootstrap output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLayout;

impl Layout for SimpleLayout {
    fn format(&self, event: &LogEvent) -> String {
        format!(
            "{} - {}{}",
            event.level(),
            event.message(),
            LINE_SEPARATOR
        )
    }
}
