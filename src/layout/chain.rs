/// Ordered, immutable sequence of converter nodes
use crate::event::LogEvent;
use crate::layout::converter::{Convert, Converter};
use crate::layout::features::LayoutFeatures;

/// The parsed form of a conversion pattern.
///
/// Node order is rendering order and is fixed at parse time; a chain is never
/// mutated after construction. Layouts that rebuild their pattern swap in a
/// whole new chain instead (see `PatternLayout::set_conversion_pattern`), so
/// concurrent renders always see a complete chain.
#[derive(Debug, Clone)]
pub struct ConverterChain {
    nodes: Vec<Converter>,
}

impl ConverterChain {
    pub(crate) fn new(nodes: Vec<Converter>) -> Self {
        Self { nodes }
    }

    /// Render `event` by walking the nodes in order and concatenating their
    /// contributions. Never mutates the event, never fails.
    pub fn render(&self, event: &LogEvent) -> String {
        // 128 covers the common single-line case without reallocating.
        let mut out = String::with_capacity(128);
        for node in &self.nodes {
            node.render(event, &mut out);
        }
        out
    }

    /// Union of the event fields any node in this chain reads.
    pub fn features(&self) -> LayoutFeatures {
        self.nodes
            .iter()
            .fold(LayoutFeatures::empty(), |acc, node| acc | node.features())
    }

    pub fn nodes(&self) -> &[Converter] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Level;
    use crate::layout::converter::{
        FileConverter, LiteralConverter, MdcConverter, MessageConverter,
    };
    use crate::layout::format_spec::FormatSpec;

    fn sample_chain() -> ConverterChain {
        ConverterChain::new(vec![
            Converter::from(LiteralConverter {
                text: "msg=".to_owned(),
            }),
            Converter::from(MessageConverter {
                fmt: FormatSpec::default(),
            }),
        ])
    }

    #[test]
    fn test_render_concatenates_in_order() {
        let event = LogEvent::new("app", Level::Info, "hello");
        assert_eq!(sample_chain().render(&event), "msg=hello");
    }

    #[test]
    fn test_empty_chain_renders_empty() {
        let event = LogEvent::new("app", Level::Info, "hello");
        let chain = ConverterChain::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(chain.render(&event), "");
    }

    #[test]
    fn test_features_union() {
        let chain = ConverterChain::new(vec![
            Converter::from(FileConverter {
                fmt: FormatSpec::default(),
            }),
            Converter::from(MdcConverter {
                fmt: FormatSpec::default(),
                key: None,
            }),
        ]);
        assert_eq!(
            chain.features(),
            LayoutFeatures::LOCATION | LayoutFeatures::MDC
        );
    }

    #[test]
    fn test_features_empty_for_plain_chain() {
        assert_eq!(sample_chain().features(), LayoutFeatures::empty());
    }

    #[test]
    fn test_len() {
        assert_eq!(sample_chain().len(), 2);
    }
}
