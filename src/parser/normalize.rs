use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extracted text split for the two consumers downstream: segmentation needs
/// line boundaries, everything else wants one collapsed string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    pub lines: Vec<String>,
    pub full_text: String,
}

impl NormalizedText {
    pub fn content_chars(&self) -> usize {
        self.full_text.chars().filter(|c| !c.is_whitespace()).count()
    }
}

pub fn normalize(raw: &str) -> NormalizedText {
    let lines: Vec<String> = strip_control(raw)
        .split(['\n', '\r'])
        .map(collapse_whitespace)
        .filter(|l| !l.is_empty())
        .collect();
    let full_text = lines.join(" ");

    NormalizedText { lines, full_text }
}

/// Trim and squeeze every whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Drop control characters. Page breaks (form feed, vertical tab) become line
/// breaks; `\n`, `\r` and `\t` pass through.
fn strip_control(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(c),
            '\u{000B}' | '\u{000C}' | '\u{2028}' | '\u{2029}' => Some('\n'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
