use std::fmt;
use std::str::FromStr;

use intongues_types::VocabStatus;

use crate::error::CoreError;

/// Which cards a review session draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckId {
    /// Every due card of the language (`core:any`)
    AnyDue,
    /// All cards with one status, due or not (`core:<status>`)
    ByStatus(VocabStatus),
    /// Due cards saved from one content item (`content:<id>`)
    Content(String),
}

impl FromStr for DeckId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scope, rest) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidDeck(s.to_string()))?;

        match (scope, rest) {
            ("core", "any") => Ok(DeckId::AnyDue),
            ("core", status) => Ok(DeckId::ByStatus(status.parse()?)),
            ("content", id) if !id.trim().is_empty() => Ok(DeckId::Content(id.trim().to_string())),
            _ => Err(CoreError::InvalidDeck(s.to_string())),
        }
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckId::AnyDue => write!(f, "core:any"),
            DeckId::ByStatus(status) => write!(f, "core:{status}"),
            DeckId::Content(id) => write!(f, "content:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_deck_forms() {
        assert_eq!("core:any".parse::<DeckId>().unwrap(), DeckId::AnyDue);
        assert_eq!(
            "core:familiar".parse::<DeckId>().unwrap(),
            DeckId::ByStatus(VocabStatus::Familiar)
        );
        assert_eq!(
            "content:abc-123".parse::<DeckId>().unwrap(),
            DeckId::Content("abc-123".to_string())
        );
    }

    #[test]
    fn display_matches_parse_input() {
        for raw in ["core:any", "core:recognised", "content:story-1"] {
            assert_eq!(raw.parse::<DeckId>().unwrap().to_string(), raw);
        }
    }

    #[test]
    fn rejects_malformed_decks() {
        assert!(matches!("any".parse::<DeckId>(), Err(CoreError::InvalidDeck(_))));
        assert!(matches!("content:".parse::<DeckId>(), Err(CoreError::InvalidDeck(_))));
        assert!(matches!("core:learning".parse::<DeckId>(), Err(CoreError::InvalidVariant(_))));
        assert!(matches!("shelf:any".parse::<DeckId>(), Err(CoreError::InvalidDeck(_))));
    }
}
