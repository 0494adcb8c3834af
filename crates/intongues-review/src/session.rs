use std::fmt;

use chrono::{DateTime, Utc};
use intongues_core::DeckId;
use intongues_store::{ReviewStatsStore, StoreError, VocabStore};
use intongues_types::{ReviewCard, ReviewMode, ReviewQuality, VocabEntry, VocabStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No deck chosen yet
    Shelves,
    Loading,
    /// Front of the current card is shown
    Active,
    AnswerShown,
    /// Nothing left to review until the deck is loaded again
    Empty,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Shelves => "shelves",
            Phase::Loading => "loading",
            Phase::Active => "active",
            Phase::AnswerShown => "answer shown",
            Phase::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealOutcome {
    /// Pronunciation should start now
    pub play_audio: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: Phase, action: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One pass over a deck.
///
/// The queue is loaded once; answered cards are dropped from memory only and
/// the store is not re-queried until [`ReviewSession::load`] runs again.
pub struct ReviewSession {
    vocab: VocabStore,
    stats: ReviewStatsStore,
    user_id: String,
    language: String,
    mode: ReviewMode,
    auto_play: bool,
    deck: Option<DeckId>,
    phase: Phase,
    queue: Vec<ReviewCard>,
    index: usize,
    answered: Vec<String>,
}

impl ReviewSession {
    pub fn new(
        vocab: VocabStore,
        stats: ReviewStatsStore,
        user_id: &str,
        language: &str,
        mode: ReviewMode,
        auto_play: bool,
    ) -> Self {
        Self {
            vocab,
            stats,
            user_id: user_id.to_string(),
            language: language.to_string(),
            mode,
            auto_play,
            deck: None,
            phase: Phase::Shelves,
            queue: Vec::new(),
            index: 0,
            answered: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn deck(&self) -> Option<&DeckId> {
        self.deck.as_ref()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Keys answered since the last load, in answer order
    pub fn answered(&self) -> &[String] {
        &self.answered
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn transition_error(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.phase,
            action,
        }
    }

    pub fn select_deck(&mut self, deck: DeckId, mode: ReviewMode) {
        tracing::debug!("Selected deck {deck} in {mode} mode");
        self.deck = Some(deck);
        self.mode = mode;
        self.phase = Phase::Loading;
        self.queue.clear();
        self.index = 0;
        self.answered.clear();
    }

    /// Fill the queue from the store, returns the number of cards
    pub async fn load(&mut self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let Some(deck) = self.deck.clone() else {
            return Err(self.transition_error("load"));
        };

        self.phase = Phase::Loading;
        let cards = self
            .vocab
            .load_deck(&self.user_id, &self.language, &deck, now)
            .await?;

        self.queue = cards;
        self.index = 0;
        self.answered.clear();
        self.phase = if self.queue.is_empty() {
            Phase::Empty
        } else {
            Phase::Active
        };

        tracing::info!("Deck {deck} loaded with {} cards", self.queue.len());
        Ok(self.queue.len())
    }

    pub fn current(&self) -> Option<&ReviewCard> {
        match self.phase {
            Phase::Active | Phase::AnswerShown => self.queue.get(self.index),
            _ => None,
        }
    }

    /// Side shown before reveal
    pub fn front(&self) -> Option<String> {
        let card = self.current()?;
        Some(match self.mode {
            ReviewMode::Recognition => card.text.clone(),
            ReviewMode::Recall => card
                .translation
                .clone()
                .unwrap_or_else(|| "(no translation)".to_string()),
        })
    }

    /// Side shown after reveal
    pub fn back(&self) -> Option<String> {
        let card = self.current()?;
        Some(match self.mode {
            ReviewMode::Recognition => card
                .translation
                .clone()
                .unwrap_or_else(|| "(no translation)".to_string()),
            ReviewMode::Recall => card.text.clone(),
        })
    }

    /// In recognition mode the word is on the front, so it is spoken right away
    pub fn plays_audio_on_show(&self) -> bool {
        self.auto_play && self.mode == ReviewMode::Recognition && self.current().is_some()
    }

    pub fn reveal(&mut self) -> Result<RevealOutcome, SessionError> {
        if self.phase != Phase::Active {
            return Err(self.transition_error("reveal"));
        }

        self.phase = Phase::AnswerShown;
        Ok(RevealOutcome {
            play_audio: self.auto_play && self.mode == ReviewMode::Recall,
        })
    }

    /// Move on without answering
    pub fn skip(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Active | Phase::AnswerShown) {
            return Err(self.transition_error("skip"));
        }

        self.index = (self.index + 1) % self.queue.len();
        self.phase = Phase::Active;
        Ok(())
    }

    /// Record a response for the revealed card and drop it from the queue
    pub async fn answer(
        &mut self,
        quality: ReviewQuality,
        now: DateTime<Utc>,
    ) -> Result<VocabEntry, SessionError> {
        if self.phase != Phase::AnswerShown {
            return Err(self.transition_error("answer"));
        }
        let Some(card) = self.queue.get(self.index).cloned() else {
            return Err(self.transition_error("answer"));
        };

        let entry = self
            .vocab
            .update_vocab_srs(
                &self.user_id,
                &self.language,
                &card.normalised,
                quality,
                self.mode,
                now,
            )
            .await?;

        if let Err(e) = self
            .stats
            .record(&self.user_id, &self.language, quality, now)
            .await
        {
            tracing::warn!("Failed to record review stats: {e}");
        }

        self.queue.remove(self.index);
        self.answered.push(card.normalised);

        if self.queue.is_empty() {
            self.index = 0;
            self.phase = Phase::Empty;
            tracing::info!("Deck finished, {} cards answered", self.answered.len());
        } else {
            if self.index >= self.queue.len() {
                self.index = 0;
            }
            self.phase = Phase::Active;
        }

        Ok(entry)
    }

    /// Override the current card's status without answering it
    pub async fn correct_status(&mut self, status: VocabStatus) -> Result<VocabEntry, SessionError> {
        if !matches!(self.phase, Phase::Active | Phase::AnswerShown) {
            return Err(self.transition_error("correct status"));
        }
        let Some(card) = self.queue.get_mut(self.index) else {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                action: "correct status",
            });
        };

        let entry = self
            .vocab
            .set_vocab_status(&self.user_id, &self.language, &card.normalised, status)
            .await?;
        card.status = entry.status;

        Ok(entry)
    }
}
