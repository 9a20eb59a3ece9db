use std::sync::LazyLock;

use regex::Regex;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").unwrap());
static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*|__").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static HTML_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(!doctype|html|body|div|p|h[1-6]|span|ul|li|br)\b").unwrap()
});
static HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<head\b.*?</head\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>",
    )
    .unwrap()
});
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(br|p|div|li|ul|ol|tr|section|article|h[1-6])\b[^>]*>").unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

/// Reduce scraped markdown to plain lines: images dropped, links replaced by
/// their text, heading/list/emphasis markers removed.
pub fn markdown_to_text(md: &str) -> String {
    let text = IMAGE_RE.replace_all(md, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = HEADING_RE.replace_all(&text, "");
    let text = LIST_MARKER_RE.replace_all(&text, "");
    let text = EMPHASIS_RE.replace_all(&text, "");
    BLANKS_RE.replace_all(&text, "\n\n").to_string()
}

pub fn looks_like_html(text: &str) -> bool {
    HTML_HINT_RE.is_match(text)
}

/// Reduce an HTML page to text, one line per block element.
pub fn html_to_text(html: &str) -> String {
    let text = HIDDEN_BLOCK_RE.replace_all(html, "");
    let text = BLOCK_TAG_RE.replace_all(&text, "\n");
    // Inline tags become spaces so adjacent spans stay separate words.
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    BLANKS_RE.replace_all(&text, "\n\n").to_string()
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    text.replace("&nbsp;", " ")
        .replace("&mdash;", "\u{2014}")
        .replace("&ndash;", "\u{2013}")
        .replace("&hellip;", "\u{2026}")
        .replace("&middot;", "\u{00B7}")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&rdquo;", "\u{201D}")
        .replace("&ldquo;", "\u{201C}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
