/// Immutable snapshot of a single logging call
use crate::event::level::Level;
use crate::event::location::LocationInfo;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static PROCESS_START: OnceLock<DateTime<Utc>> = OnceLock::new();

/// Timestamp anchor used for relative-time rendering (`%r`).
///
/// Fixed on first access; typically that happens when the first event is
/// constructed, which matches the original framework's class-load anchor
/// closely enough for diagnostics.
pub fn process_start_time() -> DateTime<Utc> {
    *PROCESS_START.get_or_init(Utc::now)
}

/// A single log event as handed to layouts.
///
/// The rendering pipeline only ever reads from an event; all mutation happens
/// through the `with_*` builders before the event is published. MDC and NDC
/// values are snapshots taken at construction, so rendering never touches
/// thread-local storage.
#[derive(Debug, Clone)]
pub struct LogEvent {
    logger_name: String,
    level: Level,
    message: String,
    thread_name: String,
    timestamp: DateTime<Utc>,
    location: Option<LocationInfo>,
    mdc: BTreeMap<String, String>,
    ndc: Vec<String>,
    throwable: Option<String>,
}

impl LogEvent {
    /// Create an event stamped with the current time and the calling thread's
    /// name. Threads without a name render as `unnamed`.
    pub fn new(logger_name: &str, level: Level, message: &str) -> Self {
        process_start_time();
        Self {
            logger_name: logger_name.to_owned(),
            level,
            message: message.to_owned(),
            thread_name: std::thread::current()
                .name()
                .unwrap_or("unnamed")
                .to_owned(),
            timestamp: Utc::now(),
            location: None,
            mdc: BTreeMap::new(),
            ndc: Vec::new(),
            throwable: None,
        }
    }

    pub fn with_thread_name(mut self, thread_name: &str) -> Self {
        self.thread_name = thread_name.to_owned();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_location(mut self, location: LocationInfo) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_mdc(mut self, key: &str, value: &str) -> Self {
        self.mdc.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_ndc(mut self, context: &str) -> Self {
        self.ndc.push(context.to_owned());
        self
    }

    pub fn with_throwable(mut self, throwable: &str) -> Self {
        self.throwable = Some(throwable.to_owned());
        self
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn location(&self) -> Option<&LocationInfo> {
        self.location.as_ref()
    }

    /// Mapped diagnostic context lookup. An absent key is not an error.
    pub fn mdc(&self, key: &str) -> Option<&str> {
        self.mdc.get(key).map(String::as_str)
    }

    /// All MDC entries in key order.
    pub fn mdc_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mdc
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_mdc(&self) -> bool {
        !self.mdc.is_empty()
    }

    /// Nested diagnostic context stack, innermost last.
    pub fn ndc(&self) -> &[String] {
        &self.ndc
    }

    /// The NDC stack in its rendered form: entries joined by single spaces.
    pub fn ndc_joined(&self) -> String {
        self.ndc.join(" ")
    }

    pub fn throwable(&self) -> Option<&str> {
        self.throwable.as_deref()
    }

    /// Milliseconds between the process-start anchor and this event.
    pub fn relative_millis(&self) -> i64 {
        (self.timestamp - process_start_time())
            .num_milliseconds()
            .max(0)
    }
}
