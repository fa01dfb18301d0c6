//! Text helpers for list-row summaries.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\n\r\x0B\x0C\x{85}\x{2028}\x{2029}]").expect("valid line break regex")
});

/// Returns `text` up to (not including) its first line break.
///
/// Recognizes LF, CR, VT, FF, NEL and the Unicode line/paragraph
/// separators; returns the whole string when none is present.
pub fn first_line(text: &str) -> &str {
    match LINE_BREAK_RE.find(text) {
        Some(found) => &text[..found.start()],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::first_line;

    #[test]
    fn returns_text_before_first_break() {
        assert_eq!(first_line("Hello\nWorld"), "Hello");
        assert_eq!(first_line("Solo"), "Solo");
    }

    #[test]
    fn handles_crlf_and_unicode_separators() {
        assert_eq!(first_line("one\r\ntwo"), "one");
        assert_eq!(first_line("para\u{2029}next"), "para");
        assert_eq!(first_line("\nleading"), "");
        assert_eq!(first_line(""), "");
    }
}
