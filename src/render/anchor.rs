//! Section anchors and intra-document links.

use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| {
        Regex::new(r##"[(),'"!@#$%^&*;:]"##).expect("Invalid regex pattern")
    })
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"))
}

/// Anchor slug for a section title.
///
/// Trimmed, lowercased, stripped of `( ) , ' " ! @ # $ % ^ & * ; :`, with
/// whitespace runs collapsed to `-`.
pub fn section_anchor(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = punctuation().replace_all(&lowered, "");
    whitespace().replace_all(&stripped, "-").into_owned()
}

/// Markdown link to the section titled `title`.
pub fn section_link(title: &str) -> String {
    format!("[{}](#{})", title, section_anchor(title))
}
