/// Field width and justification applied to a converter's raw output
///
/// The asymmetry here is deliberate and load-bearing: fields shorter than the
/// minimum width are padded on the left (right-justified) unless the `-` flag
/// was given, while fields longer than the maximum width keep their *trailing*
/// characters. Logger names are the classic case: the tail of a dotted name
/// carries the information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatSpec {
    pub min_width: Option<usize>,
    pub max_width: Option<usize>,
    pub left_justify: bool,
}

impl FormatSpec {
    /// True when no width handling is needed and raw output can be appended
    /// directly.
    pub fn is_plain(&self) -> bool {
        self.min_width.is_none() && self.max_width.is_none()
    }

    /// Apply truncation then padding to `raw`, appending the result to `out`.
    /// Operates on characters, not bytes.
    pub fn apply(&self, raw: &str, out: &mut String) {
        if self.is_plain() {
            out.push_str(raw);
            return;
        }

        let char_count = raw.chars().count();
        let (text, text_len) = match self.max_width {
            Some(max) if char_count > max => {
                let skip = char_count - max;
                let start = raw
                    .char_indices()
                    .nth(skip)
                    .map(|(idx, _)| idx)
                    .unwrap_or(raw.len());
                (raw.get(start..).unwrap_or(""), max)
            }
            _ => (raw, char_count),
        };

        match self.min_width {
            Some(min) if text_len < min => {
                let pad = min - text_len;
                if self.left_justify {
                    out.push_str(text);
                    out.push_str(&" ".repeat(pad));
                } else {
                    out.push_str(&" ".repeat(pad));
                    out.push_str(text);
                }
            }
            _ => out.push_str(text),
        }
    }
}
