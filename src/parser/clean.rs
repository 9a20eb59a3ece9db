use std::sync::LazyLock;

use regex::Regex;

use super::normalize::collapse_whitespace;

/// Verbs whose presence turns a section into a bullet list of achievements.
pub const ACTION_VERBS: &[&str] = &[
    "achieved",
    "built",
    "created",
    "delivered",
    "designed",
    "developed",
    "implemented",
    "improved",
    "increased",
    "launched",
    "led",
    "managed",
    "reduced",
    "spearheaded",
];

const BULLET: &str = "• ";

static ACTION_VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", ACTION_VERBS.join("|"))).unwrap()
});

/// Collapse one section's raw lines into its final text.
pub fn clean_section(lines: &[String]) -> String {
    let joined = collapse_whitespace(&lines.join(" "));
    if has_action_verb(&joined) {
        bulletize(&joined)
    } else {
        joined
    }
}

pub fn has_action_verb(text: &str) -> bool {
    ACTION_VERB_RE.is_match(text)
}

/// One bullet per sentence, split on ". ".
fn bulletize(text: &str) -> String {
    text.split(". ")
        .map(|s| s.trim().trim_end_matches('.').trim_end())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with(['!', '?']) {
                format!("{BULLET}{s}")
            } else {
                format!("{BULLET}{s}.")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
