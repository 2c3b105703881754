/// Converter nodes produced by the pattern parser
use crate::event::LogEvent;
use crate::layout::features::LayoutFeatures;
use crate::layout::format_spec::FormatSpec;
use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;

/// Platform line separator emitted by `%n`.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// One node of a converter chain.
///
/// Implementations compute a raw field value from the event and push it
/// through their [`FormatSpec`]. Rendering never mutates the event and a
/// missing optional value contributes an empty string, so a node can never
/// fail a render.
#[enum_dispatch]
pub trait Convert {
    fn render(&self, event: &LogEvent, out: &mut String);

    /// Which event fields this node reads. Defaults to none.
    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::empty()
    }
}

/// Date sub-format selected by the `%d{...}` option.
///
/// The named forms match the original framework's built-in date formats;
/// anything else is treated as a `chrono` strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    Iso8601,
    Absolute,
    Date,
    Custom(String),
}

impl DateFormat {
    pub fn from_option(option: Option<&str>) -> Self {
        match option {
            None | Some("ISO8601") => DateFormat::Iso8601,
            Some("ABSOLUTE") => DateFormat::Absolute,
            Some("DATE") => DateFormat::Date,
            Some(custom) => DateFormat::Custom(custom.to_owned()),
        }
    }

    fn format(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            DateFormat::Iso8601 => timestamp.format("%Y-%m-%d %H:%M:%S,%3f").to_string(),
            DateFormat::Absolute => timestamp.format("%H:%M:%S,%3f").to_string(),
            DateFormat::Date => timestamp.format("%d %b %Y %H:%M:%S,%3f").to_string(),
            DateFormat::Custom(pattern) => timestamp.format(pattern).to_string(),
        }
    }
}

/// Keep the last `precision` dot-separated components of a dotted name.
fn abbreviate(name: &str, precision: Option<usize>) -> &str {
    let Some(precision) = precision else {
        return name;
    };
    if precision == 0 {
        return name;
    }
    let mut end = name.len();
    let mut remaining = precision;
    loop {
        let head = name.get(..end).unwrap_or(name);
        match head.rfind('.') {
            Some(dot) => {
                remaining -= 1;
                if remaining == 0 {
                    return name.get(dot + 1..).unwrap_or(name);
                }
                end = dot;
            }
            None => return name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralConverter {
    pub(crate) text: String,
}

impl Convert for LiteralConverter {
    fn render(&self, _event: &LogEvent, out: &mut String) {
        out.push_str(&self.text);
    }
}

#[derive(Debug, Clone)]
pub struct MessageConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for MessageConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(event.message(), out);
    }
}

#[derive(Debug, Clone)]
pub struct LoggerNameConverter {
    pub(crate) fmt: FormatSpec,
    pub(crate) precision: Option<usize>,
}

impl Convert for LoggerNameConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt
            .apply(abbreviate(event.logger_name(), self.precision), out);
    }
}

#[derive(Debug, Clone)]
pub struct ClassNameConverter {
    pub(crate) fmt: FormatSpec,
    pub(crate) precision: Option<usize>,
}

impl Convert for ClassNameConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        let class_name = event.location().map(|l| l.class_name()).unwrap_or("");
        self.fmt.apply(abbreviate(class_name, self.precision), out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::LOCATION
    }
}

#[derive(Debug, Clone)]
pub struct LevelConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for LevelConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(&event.level().to_string(), out);
    }
}

#[derive(Debug, Clone)]
pub struct ThreadConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for ThreadConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(event.thread_name(), out);
    }
}

#[derive(Debug, Clone)]
pub struct DateConverter {
    pub(crate) fmt: FormatSpec,
    pub(crate) format: DateFormat,
}

impl Convert for DateConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(&self.format.format(&event.timestamp()), out);
    }
}

#[derive(Debug, Clone)]
pub struct FileConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for FileConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        let file = event.location().map(|l| l.file_name()).unwrap_or("");
        self.fmt.apply(file, out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::LOCATION
    }
}

#[derive(Debug, Clone)]
pub struct LineConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for LineConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        let line = event
            .location()
            .map(|l| l.line().to_string())
            .unwrap_or_default();
        self.fmt.apply(&line, out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::LOCATION
    }
}

#[derive(Debug, Clone)]
pub struct MethodConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for MethodConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        let method = event.location().map(|l| l.method_name()).unwrap_or("");
        self.fmt.apply(method, out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::LOCATION
    }
}

#[derive(Debug, Clone)]
pub struct FullLocationConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for FullLocationConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        let info = event
            .location()
            .map(|location| location.full_info())
            .unwrap_or_default();
        self.fmt.apply(&info, out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::LOCATION
    }
}

#[derive(Debug, Clone)]
pub struct NdcConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for NdcConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(&event.ndc_joined(), out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::NDC
    }
}

#[derive(Debug, Clone)]
pub struct MdcConverter {
    pub(crate) fmt: FormatSpec,
    pub(crate) key: Option<String>,
}

impl Convert for MdcConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        match &self.key {
            Some(key) => self.fmt.apply(event.mdc(key).unwrap_or(""), out),
            None => {
                if !event.has_mdc() {
                    self.fmt.apply("", out);
                    return;
                }
                let mut raw = String::from("{");
                for (key, value) in event.mdc_entries() {
                    raw.push('{');
                    raw.push_str(key);
                    raw.push(',');
                    raw.push_str(value);
                    raw.push('}');
                }
                raw.push('}');
                self.fmt.apply(&raw, out);
            }
        }
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::MDC
    }
}

#[derive(Debug, Clone)]
pub struct ThrowableConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for ThrowableConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(event.throwable().unwrap_or(""), out);
    }

    fn features(&self) -> LayoutFeatures {
        LayoutFeatures::THROWABLE
    }
}

#[derive(Debug, Clone)]
pub struct RelativeTimeConverter {
    pub(crate) fmt: FormatSpec,
}

impl Convert for RelativeTimeConverter {
    fn render(&self, event: &LogEvent, out: &mut String) {
        self.fmt.apply(&event.relative_millis().to_string(), out);
    }
}

/// Degraded stand-in for an unrecognized conversion character. Renders as an
/// empty field so the rest of the pattern keeps working.
#[derive(Debug, Clone)]
pub struct UnknownConverter {
    pub(crate) character: char,
}

impl Convert for UnknownConverter {
    fn render(&self, _event: &LogEvent, _out: &mut String) {}
}

/// Tagged union over every converter kind; the chain stores these.
#[enum_dispatch(Convert)]
#[derive(Debug, Clone)]
pub enum Converter {
    Literal(LiteralConverter),
    Message(MessageConverter),
    LoggerName(LoggerNameConverter),
    ClassName(ClassNameConverter),
    Level(LevelConverter),
    Thread(ThreadConverter),
    Date(DateConverter),
    File(FileConverter),
    Line(LineConverter),
    Method(MethodConverter),
    FullLocation(FullLocationConverter),
    Ndc(NdcConverter),
    Mdc(MdcConverter),
    Throwable(ThrowableConverter),
    RelativeTime(RelativeTimeConverter),
    Unknown(UnknownConverter),
}

impl Converter {
    /// The unrecognized conversion character, if this is a degraded node.
    pub fn unknown_character(&self) -> Option<char> {
        match self {
            Converter::Unknown(node) => Some(node.character),
            _ => None,
        }
    }
}
