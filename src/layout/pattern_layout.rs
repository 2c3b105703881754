/// Pattern-driven layout backed by a converter chain
use crate::event::LogEvent;
use crate::layout::chain::ConverterChain;
use crate::layout::features::LayoutFeatures;
use crate::layout::parser::PatternParser;
use crate::layout::traits::Layout;
use std::sync::{Arc, RwLock};

/// The default conversion pattern: just the message and a line separator.
pub const DEFAULT_CONVERSION_PATTERN: &str = "%m%n";

struct CompiledPattern {
    pattern: String,
    chain: Arc<ConverterChain>,
}

/// A [`Layout`] that renders events through a parsed conversion pattern.
///
/// The chain itself is immutable; `set_conversion_pattern` parses the new
/// pattern first and then swaps the shared chain reference in one step, so a
/// concurrent `format` call either sees the complete old chain or the complete
/// new one, never a partially built chain.
pub struct PatternLayout {
    compiled: RwLock<CompiledPattern>,
}

impl PatternLayout {
    pub fn new(pattern: &str) -> Self {
        Self {
            compiled: RwLock::new(Self::compile(pattern)),
        }
    }

    fn compile(pattern: &str) -> CompiledPattern {
        CompiledPattern {
            pattern: pattern.to_owned(),
            chain: Arc::new(PatternParser::new(pattern).parse()),
        }
    }

    /// The currently active conversion pattern.
    pub fn conversion_pattern(&self) -> String {
        let Ok(compiled) = self.compiled.read() else {
            log::error!("pattern layout state poisoned; returning default pattern");
            return DEFAULT_CONVERSION_PATTERN.to_owned();
        };
        compiled.pattern.clone()
    }

    /// Replace the conversion pattern, publishing the rebuilt chain
    /// atomically.
    pub fn set_conversion_pattern(&self, pattern: &str) {
        let compiled = Self::compile(pattern);
        match self.compiled.write() {
            Ok(mut guard) => *guard = compiled,
            Err(poisoned) => *poisoned.into_inner() = compiled,
        }
        log::debug!("conversion pattern set to `{pattern}`");
    }

    /// The active chain. Renders taken from this handle stay valid even if
    /// the pattern is swapped concurrently.
    pub fn chain(&self) -> Arc<ConverterChain> {
        let Ok(compiled) = self.compiled.read() else {
            log::error!("pattern layout state poisoned; rendering nothing");
            return Arc::new(ConverterChain::new(Vec::new()));
        };
        Arc::clone(&compiled.chain)
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSION_PATTERN)
    }
}

impl Layout for PatternLayout {
    fn format(&self, event: &LogEvent) -> String {
        self.chain().render(event)
    }

    fn requires(&self) -> LayoutFeatures {
        self.chain().features()
    }
}
