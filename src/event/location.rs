/// Best-effort call-site information attached to a log event
use std::fmt;

/// Where a log event was issued from.
///
/// Location capture is expensive, so events carry this only when something in
/// the rendering pipeline asks for it (see `LayoutFeatures::LOCATION`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    class_name: String,
    method_name: String,
    file_name: String,
    line: u32,
}

impl LocationInfo {
    pub fn new(class_name: &str, method_name: &str, file_name: &str, line: u32) -> Self {
        Self {
            class_name: class_name.to_owned(),
            method_name: method_name.to_owned(),
            file_name: file_name.to_owned(),
            line,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// The combined `class.method(file:line)` form rendered by `%l`.
    pub fn full_info(&self) -> String {
        format!(
            "{}.{}({}:{})",
            self.class_name, self.method_name, self.file_name, self.line
        )
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_info())
    }
}
