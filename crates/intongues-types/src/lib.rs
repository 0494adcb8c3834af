pub mod content;
pub mod types;
pub mod vocab;

pub use content::{Collection, ContentItem, ContentKind, SpotifyKind, StorySource, TranscriptSegment};
pub use types::{AppEvent, OutputLine};
pub use vocab::{
    ParseVariantError, ReviewCard, ReviewMode, ReviewQuality, ReviewRecord, SrsState, VocabEntry,
    VocabStatus,
};
