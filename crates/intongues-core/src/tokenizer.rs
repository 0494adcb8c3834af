use std::collections::{HashMap, HashSet};

use intongues_types::VocabStatus;
use serde::Serialize;

use crate::preprocess::{WORD_RE, normalise, starts_with_word_char};
use crate::vocab_map::VocabMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Phrase,
    /// Whitespace and punctuation between words
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact slice of the input, original casing kept
    pub text: String,
    pub normalised: Option<String>,
    pub status: Option<VocabStatus>,
    /// Byte offset in the input
    pub position: usize,
}

impl Token {
    fn separator(text: &str, position: usize) -> Self {
        Self {
            kind: TokenKind::Separator,
            text: text.to_string(),
            normalised: None,
            status: None,
            position,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == TokenKind::Word && self.text.chars().all(char::is_numeric)
    }

    pub fn highlight(&self) -> Highlight {
        match self.kind {
            TokenKind::Separator => Highlight::Plain,
            _ if self.is_numeric() => Highlight::Plain,
            _ => match self.status {
                Some(status) => Highlight::Status(status),
                None => Highlight::New,
            },
        }
    }
}

/// How a token is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Highlight {
    Plain,
    /// Word with no vocabulary entry yet
    New,
    Status(VocabStatus),
}

impl Highlight {
    pub fn css_class(&self) -> &'static str {
        match self {
            Highlight::Plain => "",
            Highlight::New => "word-new",
            Highlight::Status(VocabStatus::Unknown) => "word-unknown",
            Highlight::Status(VocabStatus::Recognised) => "word-recognised",
            Highlight::Status(VocabStatus::Familiar) => "word-familiar",
            Highlight::Status(VocabStatus::Known) => "word-known",
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Highlight::Plain => 0.0,
            Highlight::New => 1.0,
            Highlight::Status(VocabStatus::Unknown) => 0.8,
            Highlight::Status(VocabStatus::Recognised) => 0.5,
            Highlight::Status(VocabStatus::Familiar) => 0.25,
            Highlight::Status(VocabStatus::Known) => 0.0,
        }
    }
}

/// Splits text into word, phrase and separator tokens annotated from a vocabulary
pub struct Highlighter<'a> {
    vocab: &'a VocabMap,
    /// First word of each phrase key -> phrases, longest first
    phrases: HashMap<String, Vec<&'a str>>,
}

impl<'a> Highlighter<'a> {
    pub fn new(vocab: &'a VocabMap) -> Self {
        let mut phrases: HashMap<String, Vec<&'a str>> = HashMap::new();

        for key in vocab.phrase_keys() {
            if let Some(first) = WORD_RE.find(key) {
                phrases.entry(first.as_str().to_string()).or_default().push(key);
            }
        }

        tracing::debug!(
            "Highlighter built with {} entries, {} phrase heads",
            vocab.len(),
            phrases.len()
        );

        Self { vocab, phrases }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for word in WORD_RE.find_iter(text) {
            // Inside a phrase that was already emitted
            if word.start() < cursor {
                continue;
            }

            if word.start() > cursor {
                tokens.push(Token::separator(&text[cursor..word.start()], cursor));
            }

            let key = normalise(word.as_str());

            if let Some((end, phrase)) = self.match_phrase(text, word.start(), &key) {
                tokens.push(Token {
                    kind: TokenKind::Phrase,
                    text: text[word.start()..end].to_string(),
                    normalised: Some(phrase.to_string()),
                    status: self.vocab.status_of(phrase),
                    position: word.start(),
                });
                cursor = end;
                continue;
            }

            let numeric = word.as_str().chars().all(char::is_numeric);
            tokens.push(Token {
                kind: TokenKind::Word,
                text: word.as_str().to_string(),
                status: if numeric { None } else { self.vocab.status_of(&key) },
                normalised: Some(key),
                position: word.start(),
            });
            cursor = word.end();
        }

        if cursor < text.len() {
            tokens.push(Token::separator(&text[cursor..], cursor));
        }

        tokens
    }

    /// Longest known phrase starting at `start`, as (end offset, phrase key)
    fn match_phrase(&self, text: &str, start: usize, first_word: &str) -> Option<(usize, &'a str)> {
        let candidates = self.phrases.get(first_word)?;

        candidates
            .iter()
            .find_map(|phrase| match_at(text, start, phrase).map(|end| (end, *phrase)))
    }
}

/// Case-insensitive match of a normalised phrase at `start`.
/// A single space in the phrase matches any whitespace run in the text.
fn match_at(text: &str, start: usize, phrase: &str) -> Option<usize> {
    let mut expected = phrase.chars();
    let mut chars = text[start..].char_indices().peekable();
    let mut end = start;

    while let Some(want) = expected.next() {
        if want == ' ' {
            let (_, c) = chars.next()?;
            if !c.is_whitespace() {
                return None;
            }
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            continue;
        }

        let (offset, c) = chars.next()?;
        let mut lowered = c.to_lowercase();
        if lowered.next()? != want {
            return None;
        }
        // Multi-char lowercase expansions must continue the phrase
        for extra in lowered {
            if expected.next()? != extra {
                return None;
            }
        }
        end = start + offset + c.len_utf8();
    }

    if starts_with_word_char(&text[end..]) {
        return None;
    }

    Some(end)
}

/// Share of non-numeric word and phrase tokens already familiar or known
pub fn vocab_coverage(tokens: &[Token]) -> f64 {
    let lexical: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Separator && !t.is_numeric())
        .collect();

    if lexical.is_empty() {
        return 0.0;
    }

    let covered = lexical
        .iter()
        .filter(|t| matches!(t.status, Some(VocabStatus::Familiar | VocabStatus::Known)))
        .count();

    covered as f64 / lexical.len() as f64
}

/// Distinct keys of words with no vocabulary entry, in order of first appearance
pub fn new_words(tokens: &[Token]) -> Vec<String> {
    let mut seen = HashSet::new();

    tokens
        .iter()
        .filter(|t| t.highlight() == Highlight::New)
        .filter_map(|t| t.normalised.clone())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::vocab_map::tests::entry;

    fn vocab(items: &[(&str, VocabStatus)]) -> VocabMap {
        items.iter().map(|(text, status)| entry(text, *status)).collect()
    }

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn reconstruction_is_lossless() {
        let map = vocab(&[
            ("good morning", VocabStatus::Unknown),
            ("café", VocabStatus::Known),
        ]);
        let highlighter = Highlighter::new(&map);

        let inputs = [
            "",
            "   ",
            "Good   morning!! ¿Qué tal? 42 cafés",
            "«Café», dit-il.\n\tGood\nmorning",
            "emoji 🎉 mid-sentence… and trailing space ",
            "cafe\u{0301} decomposed",
        ];

        for input in inputs {
            let tokens = highlighter.tokenize(input);
            assert_eq!(joined(&tokens), input);
            for token in &tokens {
                assert_eq!(&input[token.position..token.position + token.text.len()], token.text);
            }
        }
    }

    /// Fragments that exercise phrase matching, mixed with arbitrary text
    fn text_strategy() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            Just("Good".to_string()),
            Just("morning".to_string()),
            Just("  \n".to_string()),
            Just("İstanbul".to_string()),
            Just("cafe\u{0301}".to_string()),
            Just("aujourd'hui".to_string()),
            "\\PC{0,4}",
            any::<String>(),
        ];
        prop::collection::vec(fragment, 0..16).prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_reconstruction_is_lossless(input in text_strategy()) {
            let map = vocab(&[
                ("good morning", VocabStatus::Unknown),
                ("İstanbul güzel", VocabStatus::Known),
                ("aujourd'hui c'est", VocabStatus::Familiar),
                ("café", VocabStatus::Known),
            ]);
            let tokens = Highlighter::new(&map).tokenize(&input);

            prop_assert_eq!(joined(&tokens), input.clone());
            for token in &tokens {
                prop_assert!(!token.text.is_empty());
                prop_assert_eq!(&input[token.position..token.position + token.text.len()], token.text.as_str());
            }
        }
    }

    #[test]
    fn multi_char_lowercase_continues_phrase() {
        // 'İ' lowercases to 'i' plus a combining dot
        let map = vocab(&[("İstanbul güzel", VocabStatus::Known)]);
        assert_eq!(map.phrase_keys().len(), 1);

        let tokens = Highlighter::new(&map).tokenize("İstanbul güzel!");
        assert_eq!(tokens[0].kind, TokenKind::Phrase);
        assert_eq!(tokens[0].text, "İstanbul güzel");
        assert_eq!(tokens[0].status, Some(VocabStatus::Known));
        assert_eq!(tokens[1].text, "!");
    }

    #[test]
    fn multi_char_lowercase_must_match_whole_expansion() {
        // The dotted capital expands past the plain 'i' of the key
        let map = vocab(&[("ab istanbul", VocabStatus::Known)]);
        let tokens = Highlighter::new(&map).tokenize("ab İstanbul");

        assert!(tokens.iter().all(|t| t.kind != TokenKind::Phrase));
        assert_eq!(tokens[0].text, "ab");
        assert_eq!(tokens[2].text, "İstanbul");
        assert_eq!(tokens[2].highlight(), Highlight::New);

        let plain = Highlighter::new(&map).tokenize("AB ISTANBUL");
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].kind, TokenKind::Phrase);
    }

    #[test]
    fn phrase_with_inner_punctuation() {
        let map = vocab(&[
            ("aujourd'hui c'est", VocabStatus::Familiar),
            ("lundi", VocabStatus::Unknown),
        ]);
        let tokens = Highlighter::new(&map).tokenize("Aujourd'hui c'est lundi.");

        assert_eq!(tokens[0].kind, TokenKind::Phrase);
        assert_eq!(tokens[0].text, "Aujourd'hui c'est");
        assert_eq!(tokens[0].normalised.as_deref(), Some("aujourd'hui c'est"));
        assert_eq!(tokens[0].status, Some(VocabStatus::Familiar));
        assert_eq!(tokens[2].text, "lundi");
        assert_eq!(tokens[2].status, Some(VocabStatus::Unknown));

        // A different apostrophe is not the same phrase
        let curly = Highlighter::new(&map).tokenize("Aujourd’hui c’est lundi");
        assert!(curly.iter().all(|t| t.kind != TokenKind::Phrase));
    }

    #[test]
    fn longest_phrase_wins_over_words() {
        let map = vocab(&[
            ("good morning", VocabStatus::Recognised),
            ("morning", VocabStatus::Known),
        ]);
        let tokens = Highlighter::new(&map).tokenize("Good morning!");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Phrase);
        assert_eq!(tokens[0].text, "Good morning");
        assert_eq!(tokens[0].normalised.as_deref(), Some("good morning"));
        assert_eq!(tokens[0].status, Some(VocabStatus::Recognised));
        assert_eq!(tokens[1].kind, TokenKind::Separator);
        assert_eq!(tokens[1].text, "!");
    }

    #[test]
    fn longer_phrase_sharing_a_head_is_preferred() {
        let map = vocab(&[
            ("good morning", VocabStatus::Recognised),
            ("good morning everyone", VocabStatus::Familiar),
        ]);
        let tokens = Highlighter::new(&map).tokenize("good morning everyone");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].status, Some(VocabStatus::Familiar));
    }

    #[test]
    fn phrase_needs_word_boundary() {
        let map = vocab(&[("good morning", VocabStatus::Unknown)]);
        let tokens = Highlighter::new(&map).tokenize("good mornings");

        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["good", "mornings"]);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Phrase));
    }

    #[test]
    fn phrase_spans_line_breaks() {
        let map = vocab(&[("good morning", VocabStatus::Unknown)]);
        let tokens = Highlighter::new(&map).tokenize("Good\n  Morning");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Phrase);
        assert_eq!(tokens[0].text, "Good\n  Morning");
    }

    #[test]
    fn lookup_ignores_case_but_keeps_display() {
        let map = vocab(&[("hello", VocabStatus::Familiar)]);
        let tokens = Highlighter::new(&map).tokenize("Hello hello");

        assert_eq!(tokens[0].text, "Hello");
        assert_eq!(tokens[0].status, Some(VocabStatus::Familiar));
        assert_eq!(tokens[2].text, "hello");
        assert_eq!(tokens[2].status, Some(VocabStatus::Familiar));
    }

    #[test]
    fn unknown_words_render_new_and_numbers_plain() {
        let map = vocab(&[]);
        let tokens = Highlighter::new(&map).tokenize("Bonjour 2024 bonjour, monde");

        assert_eq!(tokens[0].highlight(), Highlight::New);
        assert_eq!(tokens[0].highlight().css_class(), "word-new");
        assert_eq!(tokens[2].highlight(), Highlight::Plain);
        assert_eq!(tokens[1].highlight().opacity(), 0.0);
        assert_eq!(new_words(&tokens), vec!["bonjour", "monde"]);
    }

    #[test]
    fn coverage_counts_familiar_and_known() {
        let map = vocab(&[
            ("el", VocabStatus::Known),
            ("gato", VocabStatus::Familiar),
            ("duerme", VocabStatus::Unknown),
        ]);
        let tokens = Highlighter::new(&map).tokenize("El gato duerme mucho, 3 horas.");

        // el, gato covered out of el, gato, duerme, mucho, horas
        assert!((vocab_coverage(&tokens) - 0.4).abs() < f64::EPSILON);
        assert_eq!(vocab_coverage(&[]), 0.0);
    }
}
