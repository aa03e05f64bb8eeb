//! Placeholder masking of non-code regions.

use crate::tokenize;

/// Delimits placeholders in masked text. Never produced by codegen.
pub const PLACEHOLDER_MARK: char = '\u{1}';

/// Source text with every literal, comment and regex replaced by an indexed
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub code: String,
    /// Original text of each masked region, by placeholder index.
    pub literals: Vec<String>,
}

/// Replace each non-code region of `source` with `\u{1}ucjs<index>\u{1}`.
pub fn mask_literals(source: &str) -> Masked {
    let mut code = String::with_capacity(source.len());
    let mut literals = Vec::new();

    for segment in tokenize(source) {
        if segment.kind.is_code() {
            code.push_str(segment.text);
        } else {
            code.push_str(&placeholder(literals.len()));
            literals.push(segment.text.to_string());
        }
    }

    Masked { code, literals }
}

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_MARK}ucjs{index}{PLACEHOLDER_MARK}")
}

impl Masked {
    /// Put the masked regions back into `code`, a rewrite of `self.code`
    /// that left the placeholders intact.
    pub fn restore(&self, code: &str) -> String {
        let literal_len: usize = self.literals.iter().map(String::len).sum();
        let mut out = String::with_capacity(code.len() + literal_len);
        let mut rest = code;

        while let Some(start) = rest.find(PLACEHOLDER_MARK) {
            out.push_str(&rest[..start]);
            let after = &rest[start + PLACEHOLDER_MARK.len_utf8()..];
            match parse_placeholder(after).and_then(|(index, used)| {
                self.literals.get(index).map(|literal| (literal, used))
            }) {
                Some((literal, used)) => {
                    out.push_str(literal);
                    rest = &after[used..];
                }
                None => {
                    out.push(PLACEHOLDER_MARK);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Parse `ucjs<index>\u{1}` at the start of `text`; returns the index and
/// the number of bytes consumed.
fn parse_placeholder(text: &str) -> Option<(usize, usize)> {
    let digits = text.strip_prefix("ucjs")?;
    let end = digits.find(PLACEHOLDER_MARK)?;
    let number = &digits[..end];
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = number.parse().ok()?;
    Some((index, "ucjs".len() + end + PLACEHOLDER_MARK.len_utf8()))
}
