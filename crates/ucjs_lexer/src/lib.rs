//! Literal-aware scanner for emitted JavaScript.
//!
//! Splits source text into code and non-code regions so that text-level
//! rewrites can run over code only:
//!
//! - string literals (`'…'`, `"…"`), escape aware
//! - template literal text (`` `…${ ``, `}…${`, `` }…` ``); interpolations are code
//! - comments (`// …`, `/* … */`)
//! - regular expression literals
//!
//! All delimiters are ASCII, so the scanner walks bytes and every segment
//! boundary falls on a UTF-8 character boundary.

mod mask;

pub use mask::{mask_literals, Masked, PLACEHOLDER_MARK};

/// Kind of a scanned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    String,
    Template,
    Comment,
    Regex,
}

impl SegmentKind {
    /// Whether the region is code that rewrites may touch.
    pub fn is_code(self) -> bool {
        self == SegmentKind::Code
    }
}

/// A contiguous region of the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

/// Words after which a `/` starts a regular expression rather than a division.
const EXPR_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Split `source` into code and non-code segments, in order.
///
/// Concatenating the segment texts reproduces `source` exactly.
pub fn tokenize(source: &str) -> Vec<Segment<'_>> {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    segments: Vec<Segment<'a>>,
    /// Start of the pending code region.
    code_start: usize,
    /// Brace depth inside each open template interpolation, innermost last.
    templates: Vec<u32>,
    regex_allowed: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            segments: Vec::new(),
            code_start: 0,
            templates: Vec::new(),
            regex_allowed: true,
        }
    }

    fn run(mut self) -> Vec<Segment<'a>> {
        let len = self.bytes.len();
        let mut i = 0;

        while i < len {
            let b = self.bytes[i];
            match b {
                b'\'' | b'"' => {
                    let end = scan_quoted(self.bytes, i, b);
                    self.push(SegmentKind::String, i, end);
                    self.regex_allowed = false;
                    i = end;
                }
                b'`' => {
                    i = self.template_chunk(i, i + 1);
                }
                b'}' if self.templates.last() == Some(&0) => {
                    self.templates.pop();
                    i = self.template_chunk(i, i + 1);
                }
                b'{' => {
                    if let Some(depth) = self.templates.last_mut() {
                        *depth += 1;
                    }
                    self.regex_allowed = true;
                    i += 1;
                }
                b'}' => {
                    if let Some(depth) = self.templates.last_mut() {
                        *depth -= 1;
                    }
                    self.regex_allowed = true;
                    i += 1;
                }
                b'/' if self.peek(i + 1) == Some(b'/') => {
                    let end = self.bytes[i..]
                        .iter()
                        .position(|&c| c == b'\n')
                        .map_or(len, |p| i + p);
                    self.push(SegmentKind::Comment, i, end);
                    i = end;
                }
                b'/' if self.peek(i + 1) == Some(b'*') => {
                    let end = find(self.bytes, i + 2, b"*/").map_or(len, |p| p + 2);
                    self.push(SegmentKind::Comment, i, end);
                    i = end;
                }
                b'/' if self.regex_allowed => {
                    let end = scan_regex(self.bytes, i);
                    self.push(SegmentKind::Regex, i, end);
                    self.regex_allowed = false;
                    i = end;
                }
                b')' | b']' => {
                    self.regex_allowed = false;
                    i += 1;
                }
                // `++`/`--` keep the preceding state: after an operand they
                // are postfix and a `/` that follows divides.
                b'+' | b'-' if self.peek(i + 1) == Some(b) => i += 2,
                c if c.is_ascii_whitespace() => i += 1,
                c if is_word_byte(c) => {
                    let end = self.bytes[i..]
                        .iter()
                        .position(|&c| !is_word_byte(c))
                        .map_or(len, |p| i + p);
                    self.regex_allowed = EXPR_KEYWORDS.contains(&&self.source[i..end]);
                    i = end;
                }
                _ => {
                    self.regex_allowed = true;
                    i += 1;
                }
            }
        }

        self.flush_code(len);
        self.segments
    }

    /// Scan template text from `text_start` up to and including the next
    /// `${` or closing backtick. `open` is the position of the delimiter that
    /// opened this chunk.
    fn template_chunk(&mut self, open: usize, text_start: usize) -> usize {
        let (end, interpolates) = scan_template_text(self.bytes, text_start);
        self.push(SegmentKind::Template, open, end);
        if interpolates {
            self.templates.push(0);
            self.regex_allowed = true;
        } else {
            self.regex_allowed = false;
        }
        end
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    fn flush_code(&mut self, end: usize) {
        if self.code_start < end {
            self.segments.push(Segment {
                kind: SegmentKind::Code,
                text: &self.source[self.code_start..end],
            });
        }
    }

    fn push(&mut self, kind: SegmentKind, start: usize, end: usize) {
        self.flush_code(start);
        self.segments.push(Segment {
            kind,
            text: &self.source[start..end],
        });
        self.code_start = end;
    }
}

/// Identifier, keyword and number characters. Non-ASCII bytes belong to
/// identifiers as well.
fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// End (exclusive) of the quoted string starting at `start`. An unescaped
/// line break ends an unterminated string.
fn scan_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// End (exclusive) of template text, and whether it stopped at `${`.
fn scan_template_text(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'`' => return (j + 1, false),
            b'$' if bytes.get(j + 1) == Some(&b'{') => return (j + 2, true),
            _ => j += 1,
        }
    }
    (bytes.len(), false)
}

/// End (exclusive) of the regular expression literal at `start`, flags included.
fn scan_regex(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    let mut in_class = false;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b'[' => {
                in_class = true;
                j += 1;
            }
            b']' => {
                in_class = false;
                j += 1;
            }
            b'/' if !in_class => {
                j += 1;
                while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
                    j += 1;
                }
                return j;
            }
            _ => j += 1,
        }
    }
    bytes.len()
}
