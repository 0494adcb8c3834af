use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A word is a run of letters, combining marks and numbers
pub static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{M}\p{N}]+").expect("word pattern is valid"));

static EDGE_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{L}\p{M}\p{N}]+|[^\p{L}\p{M}\p{N}]+$").expect("edge pattern is valid")
});

static WORD_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}\p{N}]").expect("word char pattern is valid"));

/// True when `text` starts with a letter, mark or number
pub fn starts_with_word_char(text: &str) -> bool {
    WORD_START_RE.is_match(text)
}

/// Lookup key for a word or phrase.
///
/// NFC keeps diacritics in one stable composed form, case is folded, inner
/// whitespace collapses to single spaces and surrounding punctuation is dropped.
pub fn normalise(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let lowered = composed.to_lowercase();

    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    EDGE_PUNCT_RE.replace_all(&collapsed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_is_folded() {
        assert_eq!(normalise("Hello"), normalise("hello"));
    }

    #[test]
    fn whitespace_and_punctuation_are_trimmed() {
        assert_eq!(normalise("  Good   Morning! "), "good morning");
        assert_eq!(normalise("¿Qué?"), "qué");
    }

    #[test]
    fn decomposed_diacritics_compose() {
        let decomposed = "cafe\u{0301}";
        assert_eq!(normalise(decomposed), "café");
        assert_eq!(normalise("CAFÉ"), "café");
    }

    #[test]
    fn inner_apostrophes_survive() {
        assert_eq!(normalise("Aujourd'hui,"), "aujourd'hui");
    }

    #[test]
    fn punctuation_only_is_empty() {
        assert_eq!(normalise(" ... "), "");
    }
}
