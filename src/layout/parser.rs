/// Conversion pattern parser
use crate::layout::chain::ConverterChain;
use crate::layout::converter::{
    ClassNameConverter, Converter, DateConverter, DateFormat, FileConverter,
    FullLocationConverter, LevelConverter, LineConverter, LiteralConverter, LoggerNameConverter,
    MdcConverter, MessageConverter, MethodConverter, NdcConverter, RelativeTimeConverter,
    ThreadConverter, ThrowableConverter, UnknownConverter, LINE_SEPARATOR,
};
use crate::layout::format_spec::FormatSpec;
use std::iter::Peekable;
use std::str::Chars;

/// Parses a conversion pattern into a [`ConverterChain`].
///
/// The grammar per field is `%[-][min][.max]<conversion>[{option}]`. Parsing
/// is deliberately forgiving: an unrecognized conversion character degrades to
/// an empty-rendering node, malformed width specs are dropped, and a dangling
/// `%` becomes a literal. Each degradation logs a warning; nothing aborts the
/// parse.
pub struct PatternParser<'a> {
    pattern: &'a str,
}

impl<'a> PatternParser<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self { pattern }
    }

    pub fn parse(self) -> ConverterChain {
        let mut chars = self.pattern.chars().peekable();
        let mut literal = String::new();
        let mut nodes: Vec<Converter> = Vec::new();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let mut fmt = FormatSpec::default();
            if chars.peek() == Some(&'-') {
                chars.next();
                fmt.left_justify = true;
            }
            fmt.min_width = read_number(&mut chars);
            if chars.peek() == Some(&'.') {
                chars.next();
                match read_number(&mut chars) {
                    Some(max) => fmt.max_width = Some(max),
                    None => {
                        log::warn!(
                            "pattern `{}`: expected digits after `.`; ignoring the maximum width",
                            self.pattern
                        );
                    }
                }
            }

            match chars.next() {
                None => {
                    log::warn!(
                        "pattern `{}`: dangling `%` at end of pattern; treating it as a literal",
                        self.pattern
                    );
                    literal.push('%');
                }
                Some('%') => literal.push('%'),
                Some('n') => {
                    flush_literal(&mut literal, &mut nodes);
                    nodes.push(Converter::from(LiteralConverter {
                        text: LINE_SEPARATOR.to_owned(),
                    }));
                }
                Some(conversion) => {
                    flush_literal(&mut literal, &mut nodes);
                    nodes.push(self.build_converter(conversion, fmt, &mut chars));
                }
            }
        }
        flush_literal(&mut literal, &mut nodes);

        ConverterChain::new(nodes)
    }

    fn build_converter(
        &self,
        conversion: char,
        fmt: FormatSpec,
        chars: &mut Peekable<Chars<'_>>,
    ) -> Converter {
        match conversion {
            'm' => Converter::from(MessageConverter { fmt }),
            'c' => Converter::from(LoggerNameConverter {
                fmt,
                precision: self.read_precision(chars),
            }),
            'C' => Converter::from(ClassNameConverter {
                fmt,
                precision: self.read_precision(chars),
            }),
            'p' => Converter::from(LevelConverter { fmt }),
            't' => Converter::from(ThreadConverter { fmt }),
            'd' => Converter::from(DateConverter {
                fmt,
                format: DateFormat::from_option(read_option(chars).as_deref()),
            }),
            'F' => Converter::from(FileConverter { fmt }),
            'L' => Converter::from(LineConverter { fmt }),
            'M' => Converter::from(MethodConverter { fmt }),
            'l' => Converter::from(FullLocationConverter { fmt }),
            'x' => Converter::from(NdcConverter { fmt }),
            'X' => Converter::from(MdcConverter {
                fmt,
                key: read_option(chars),
            }),
            'e' => Converter::from(ThrowableConverter { fmt }),
            'r' => Converter::from(RelativeTimeConverter { fmt }),
            unknown => {
                log::warn!(
                    "pattern `{}`: unrecognized conversion character `{unknown}`; \
                     the field will render as an empty string",
                    self.pattern
                );
                Converter::from(UnknownConverter { character: unknown })
            }
        }
    }

    fn read_precision(&self, chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
        let option = read_option(chars)?;
        match option.parse::<usize>() {
            Ok(precision) if precision > 0 => Some(precision),
            _ => {
                log::warn!(
                    "pattern `{}`: precision option `{{{option}}}` is not a positive integer; \
                     rendering the full name",
                    self.pattern
                );
                None
            }
        }
    }
}

fn flush_literal(literal: &mut String, nodes: &mut Vec<Converter>) {
    if literal.is_empty() {
        return;
    }
    nodes.push(Converter::from(LiteralConverter {
        text: std::mem::take(literal),
    }));
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(digit) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(digit);
        chars.next();
    }
    digits.parse().ok()
}

/// Consume a `{option}` suffix if one is present and properly terminated.
/// An unterminated `{` is left in place so it flows into the literal text.
fn read_option(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    if chars.peek() != Some(&'{') {
        return None;
    }

    let mut probe = chars.clone();
    probe.next();
    let mut option = String::new();
    let mut closed = false;
    for c in probe {
        if c == '}' {
            closed = true;
            break;
        }
        option.push(c);
    }
    if !closed {
        return None;
    }

    // Commit: skip '{', the option characters, and '}'.
    for _ in 0..option.chars().count() + 2 {
        chars.next();
    }
    Some(option)
}
