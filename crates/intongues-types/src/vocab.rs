use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind}: '{value}'")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseVariantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Learning status of a word or phrase, ordered from least to most learned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabStatus {
    Unknown,
    #[serde(alias = "recognized")]
    Recognised,
    Familiar,
    Known,
}

impl VocabStatus {
    pub const ALL: [VocabStatus; 4] = [
        VocabStatus::Unknown,
        VocabStatus::Recognised,
        VocabStatus::Familiar,
        VocabStatus::Known,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VocabStatus::Unknown => "unknown",
            VocabStatus::Recognised => "recognised",
            VocabStatus::Familiar => "familiar",
            VocabStatus::Known => "known",
        }
    }
}

impl fmt::Display for VocabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabStatus {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unknown" => Ok(VocabStatus::Unknown),
            "recognised" | "recognized" => Ok(VocabStatus::Recognised),
            "familiar" => Ok(VocabStatus::Familiar),
            "known" => Ok(VocabStatus::Known),
            _ => Err(ParseVariantError::new("status", s)),
        }
    }
}

/// Response button pressed on a review card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewQuality {
    Again,
    Hard,
    Good,
    Easy,
}

impl ReviewQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewQuality::Again => "again",
            ReviewQuality::Hard => "hard",
            ReviewQuality::Good => "good",
            ReviewQuality::Easy => "easy",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ReviewQuality::Again)
    }
}

impl fmt::Display for ReviewQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewQuality {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(ReviewQuality::Again),
            "hard" | "2" => Ok(ReviewQuality::Hard),
            "good" | "3" => Ok(ReviewQuality::Good),
            "easy" | "4" => Ok(ReviewQuality::Easy),
            _ => Err(ParseVariantError::new("review quality", s)),
        }
    }
}

/// Which side of the card is shown first.
///
/// Recall shows the translation and asks for the word, recognition shows the
/// word and asks for its meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    #[default]
    Recognition,
    Recall,
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewMode::Recognition => f.write_str("recognition"),
            ReviewMode::Recall => f.write_str("recall"),
        }
    }
}

impl FromStr for ReviewMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recognition" => Ok(ReviewMode::Recognition),
            "recall" => Ok(ReviewMode::Recall),
            _ => Err(ParseVariantError::new("review mode", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub at: DateTime<Utc>,
    pub quality: ReviewQuality,
    pub mode: ReviewMode,
}

/// Spaced-repetition scheduling state owned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
    pub due: DateTime<Utc>,
    pub interval_days: f64,
    pub ease: f64,
    /// Consecutive successful responses
    pub repetitions: u32,
    pub lapses: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<ReviewRecord>,
}

/// One vocabulary entry per (user, language, normalised expression)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    /// Surface form as first seen
    pub text: String,
    pub normalised: String,
    pub language: String,
    pub status: VocabStatus,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub content_ids: BTreeSet<String>,
    #[serde(default)]
    pub srs: Option<SrsState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VocabEntry {
    pub fn is_phrase(&self) -> bool {
        self.normalised.contains(' ')
    }

    /// Due when the scheduler says so, or when never reviewed and not yet known
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match &self.srs {
            Some(srs) => srs.due <= now,
            None => self.status != VocabStatus::Known,
        }
    }

    /// Sort key used for card queues: due time first, then key
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.srs.as_ref().map(|s| s.due)
    }

    pub fn to_card(&self) -> ReviewCard {
        ReviewCard {
            normalised: self.normalised.clone(),
            text: self.text.clone(),
            translation: self.translation.clone(),
            status: self.status,
            language: self.language.clone(),
        }
    }
}

/// Display projection of a [`VocabEntry`], never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub normalised: String,
    pub text: String,
    pub translation: Option<String>,
    pub status: VocabStatus,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_follows_learning_progress() {
        assert!(VocabStatus::Unknown < VocabStatus::Recognised);
        assert!(VocabStatus::Recognised < VocabStatus::Familiar);
        assert!(VocabStatus::Familiar < VocabStatus::Known);
    }

    #[test]
    fn status_parses_both_spellings() {
        assert_eq!("Recognized".parse::<VocabStatus>(), Ok(VocabStatus::Recognised));
        assert_eq!("recognised".parse::<VocabStatus>(), Ok(VocabStatus::Recognised));
        assert!("learning".parse::<VocabStatus>().is_err());
    }

    #[test]
    fn status_serialises_lowercase() {
        let json = serde_json::to_string(&VocabStatus::Familiar).unwrap();
        assert_eq!(json, "\"familiar\"");
        let parsed: VocabStatus = serde_json::from_str("\"recognized\"").unwrap();
        assert_eq!(parsed, VocabStatus::Recognised);
    }

    #[test]
    fn quality_accepts_button_numbers() {
        assert_eq!("1".parse::<ReviewQuality>(), Ok(ReviewQuality::Again));
        assert_eq!("easy".parse::<ReviewQuality>(), Ok(ReviewQuality::Easy));
        assert!(!ReviewQuality::Again.is_success());
        assert!(ReviewQuality::Hard.is_success());
    }

    #[test]
    fn never_reviewed_known_entry_is_not_due() {
        let now = Utc::now();
        let mut entry = VocabEntry {
            text: "Hola".into(),
            normalised: "hola".into(),
            language: "es".into(),
            status: VocabStatus::Known,
            translation: None,
            content_ids: BTreeSet::new(),
            srs: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!entry.is_due(now));

        entry.status = VocabStatus::Unknown;
        assert!(entry.is_due(now));
    }
}
