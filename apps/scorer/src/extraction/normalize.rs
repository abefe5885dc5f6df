//! Text normalization shared by every document format, plus small char-aware helpers
//! used by the structured extractors and the scoring engine.

use std::sync::OnceLock;

use regex::Regex;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static DISALLOWED_RE: OnceLock<Regex> = OnceLock::new();

/// Collapses whitespace runs, blanks out characters outside
/// `[\w\s.,\-+&@]`, then trims. Blanked characters leave their space behind,
/// so the output can still contain double spaces.
pub fn normalize_text(text: &str) -> String {
    let whitespace = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    let disallowed = DISALLOWED_RE
        .get_or_init(|| Regex::new(r"[^\w\s.,\-+&@]").expect("disallowed-char regex"));

    let collapsed = whitespace.replace_all(text, " ");
    let cleaned = disallowed.replace_all(&collapsed, " ");
    cleaned.trim().to_string()
}

/// Title-cases each word: a letter is upper-cased when the previous
/// character is not a letter, lower-cased otherwise.
/// `"node.js"` becomes `"Node.Js"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_alphabetic();
    }
    out
}

/// Returns the slice spanning `before` characters ahead of byte offset `start`
/// through `after` characters past byte offset `end`, clipped to the text.
pub fn char_window(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(before)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let hi = text[end..]
        .char_indices()
        .nth(after)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Jane\t\tDoe \r\n\n Engineer  "), "Jane Doe Engineer");
    }

    #[test]
    fn test_normalize_keeps_whitelisted_punctuation() {
        let text = "jane.doe@mail.com, C++ & R-lang";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_normalize_blanks_disallowed_characters() {
        assert_eq!(normalize_text("• Built (things) | fast!"), "Built  things    fast");
    }

    #[test]
    fn test_normalize_blanks_en_dash_ranges() {
        assert_eq!(normalize_text("2019–2021"), "2019 2021");
    }

    #[test]
    fn test_normalize_keeps_unicode_word_characters() {
        assert_eq!(normalize_text("José Müller"), "José Müller");
    }

    #[test]
    fn test_title_case_matches_python_semantics() {
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("six sigma"), "Six Sigma");
        assert_eq!(title_case("AWS certified"), "Aws Certified");
        assert_eq!(title_case("b.s."), "B.S.");
        assert_eq!(title_case("html5"), "Html5");
    }

    #[test]
    fn test_char_window_clips_to_text_bounds() {
        let text = "abcdefghij";
        assert_eq!(char_window(text, 4, 6, 2, 2), "cdefgh");
        assert_eq!(char_window(text, 1, 2, 10, 10), text);
    }

    #[test]
    fn test_char_window_counts_characters_not_bytes() {
        let text = "ééé2020ééé";
        let start = text.find("2020").unwrap();
        assert_eq!(char_window(text, start, start + 4, 2, 2), "éé2020éé");
    }
}
