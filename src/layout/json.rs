/// One-object-per-event JSON layout
use crate::event::LogEvent;
use crate::layout::converter::LINE_SEPARATOR;
use crate::layout::features::LayoutFeatures;
use crate::layout::traits::Layout;
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Renders each event as a single-line JSON object terminated by the line
/// separator. Diagnostic contexts and throwable text are included only when
/// present, keeping the common case compact.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayout;

impl Layout for JsonLayout {
    fn format(&self, event: &LogEvent) -> String {
        let mut map = Map::new();
        map.insert(
            "timestamp".to_owned(),
            Value::String(
                event
                    .timestamp()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        );
        map.insert("level".to_owned(), Value::String(event.level().to_string()));
        map.insert(
            "logger".to_owned(),
            Value::String(event.logger_name().to_owned()),
        );
        map.insert(
            "thread".to_owned(),
            Value::String(event.thread_name().to_owned()),
        );
        map.insert(
            "message".to_owned(),
            Value::String(event.message().to_owned()),
        );
        if event.has_mdc() {
            let mdc: Map<String, Value> = event
                .mdc_entries()
                .map(|(key, value)| (key.to_owned(), Value::String(value.to_owned())))
                .collect();
            map.insert("mdc".to_owned(), Value::Object(mdc));
        }
        if !event.ndc().is_empty() {
            let ndc = event
                .ndc()
                .iter()
                .map(|entry| Value::String(entry.clone()))
                .collect();
            map.insert("ndc".to_owned(), Value::Array(ndc));
        }
        if let Some(throwable) = event.throwable() {
            map.insert("throwable".to_owned(), Value::String(throwable.to_owned()));
        }

        let mut line = Value::Object(map).to_string();
        line.push_str(LINE_SEPARATOR);
        line
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn requires(&self) -> LayoutFeatures {
        LayoutFeatures::MDC | LayoutFeatures::NDC | LayoutFeatures::THROWABLE
    }
}
