//! Answer sanitising: strip Markdown emphasis before display.
//!
//! Models answer in Markdown even when asked not to. The terminal front end
//! renders plain text, so `***x***`, `**x**` and `*x*` are unwrapped to `x`.
//!
//! ## Rule Order
//!
//! Longest marker first. Running the single-asterisk rule before the double
//! one would turn `**bold**` into `*bold*` and leave stray markers behind.
//! Each pattern is non-greedy so `*a* and *b*` yields `a and b`, not one span
//! from the first marker to the last. `.` does not cross newlines, so spans
//! never join across lines.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BOLD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*(.*?)\*\*\*").unwrap());
static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Remove Markdown emphasis markers, keeping the enclosed text verbatim.
///
/// Pure and idempotent. Empty input returns an empty string.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = RE_BOLD_ITALIC.replace_all(text, "$1");
    let s = RE_BOLD.replace_all(&s, "$1");
    RE_ITALIC.replace_all(&s, "$1").into_owned()
}
