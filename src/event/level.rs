/// Log levels ordered by increasing severity
use strum_macros::{Display, EnumString, VariantNames};

/// Severity of a log event.
///
/// Levels are totally ordered: `Trace < Debug < Info < Warn < Error < Fatal`.
/// `Display` renders the conventional uppercase form and `FromStr` accepts it
/// case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumString,
    VariantNames,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}
