use crate::vocab::{ReviewMode, ReviewQuality, VocabStatus};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Tokenize and highlight text against the loaded vocabulary
    HighlightText(String),
    MarkWord {
        word: String,
        status: VocabStatus,
        translation: Option<String>,
        content_id: Option<String>,
    },
    TranslatePhrase(String),
    SelectDeck {
        deck: String,
        mode: ReviewMode,
    },
    Reveal,
    /// Move past the current card without answering
    Skip,
    Answer(ReviewQuality),
    CorrectStatus(VocabStatus),
    ResetProgress,
    ShowOutput(OutputLine),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Info(String),
    Card {
        front: String,
        remaining: usize,
        play_audio: bool,
    },
    Answer {
        back: String,
        play_audio: bool,
    },
    Error(String),
}
