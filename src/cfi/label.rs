//! Chapter titles from CFI labels
//!
//! Apple Books tags the spine step with the manifest id of the chapter
//! (`/6/16[chapter1]`). Those ids are the only chapter names available
//! offline, so they are turned into something readable.

use once_cell::sync::Lazy;
use regex::Regex;

use super::parser::tokenize;
use super::types::Token;

static LETTER_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])(\d)").expect("valid regex"));
static OTHER_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\dA-Za-z\s])(\d)").expect("valid regex"));
static DIGIT_OTHER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)([^\d\s])").expect("valid regex"));

/// Extract the first bracketed label of a location, e.g. `chapter1`
///
/// `^` escapes are resolved, so the label reads exactly as the tokenizer
/// sees it. Malformed locations have no label.
pub fn extract_label(location: &str) -> Option<String> {
    tokenize(location)
        .ok()?
        .into_iter()
        .find_map(|token| match token {
            Token::Label(label) if !label.is_empty() => Some(label),
            _ => None,
        })
}

/// Turn a raw label into a title: `chapter1` becomes `Chapter 1`
///
/// Rules run in a fixed order, so `ch3.6` becomes `ch 3.6`, then `ch 3. 6`,
/// then `ch 3 . 6`, and finally `Ch 3` once the part after the last period
/// is dropped.
pub fn humanize_label(label: &str) -> Option<String> {
    let spaced = LETTER_DIGIT.replace_all(label, "${1} ${2}");
    let spaced = OTHER_DIGIT.replace_all(&spaced, "${1} ${2}");
    let spaced = DIGIT_OTHER.replace_all(&spaced, "${1} ${2}");

    let mut title = capitalize(&spaced);
    if let Some(period) = title.rfind('.') {
        title.truncate(period);
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Title for the chapter a location points into, if it carries a label
pub fn humanize_location(location: &str) -> Option<String> {
    extract_label(location).as_deref().and_then(humanize_label)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
