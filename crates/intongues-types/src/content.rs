use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-scoped collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Vocab,
    Stories,
    YoutubeVideos,
    SpotifyItems,
    SpotifyPlaylists,
    PracticeLessons,
    Writing,
    SpeechRecordings,
    SpeechProfiles,
    ReviewStats,
    ReadingStats,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Vocab => "vocab",
            Collection::Stories => "stories",
            Collection::YoutubeVideos => "youtubeVideos",
            Collection::SpotifyItems => "spotifyItems",
            Collection::SpotifyPlaylists => "spotifyPlaylists",
            Collection::PracticeLessons => "practiceLessons",
            Collection::Writing => "writing",
            Collection::SpeechRecordings => "speechRecordings",
            Collection::SpeechProfiles => "speechProfiles",
            Collection::ReviewStats => "reviewStats",
            Collection::ReadingStats => "readingStats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorySource {
    Generated,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotifyKind {
    Track,
    Episode,
    Show,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Anything a user can read, watch, listen to or write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentItem {
    #[serde(rename_all = "camelCase")]
    Story {
        id: String,
        language: String,
        title: String,
        text: String,
        source: StorySource,
    },
    #[serde(rename_all = "camelCase")]
    YoutubeVideo {
        id: String,
        language: String,
        title: String,
        video_id: String,
        #[serde(default)]
        transcript: Vec<TranscriptSegment>,
    },
    #[serde(rename_all = "camelCase")]
    Writing {
        id: String,
        language: String,
        title: String,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    SpotifyItem {
        id: String,
        language: String,
        title: String,
        spotify_uri: String,
        media: SpotifyKind,
    },
}

/// Discriminant of [`ContentItem`], used to address a collection without the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Story,
    YoutubeVideo,
    Writing,
    SpotifyItem,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Story,
        ContentKind::YoutubeVideo,
        ContentKind::Writing,
        ContentKind::SpotifyItem,
    ];

    pub fn collection(&self) -> Collection {
        match self {
            ContentKind::Story => Collection::Stories,
            ContentKind::YoutubeVideo => Collection::YoutubeVideos,
            ContentKind::Writing => Collection::Writing,
            ContentKind::SpotifyItem => Collection::SpotifyItems,
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl ContentItem {
    pub fn new_story(language: &str, title: &str, text: &str, source: StorySource) -> Self {
        ContentItem::Story {
            id: new_id(),
            language: language.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            source,
        }
    }

    pub fn new_youtube_video(
        language: &str,
        title: &str,
        video_id: &str,
        transcript: Vec<TranscriptSegment>,
    ) -> Self {
        ContentItem::YoutubeVideo {
            id: new_id(),
            language: language.to_string(),
            title: title.to_string(),
            video_id: video_id.to_string(),
            transcript,
        }
    }

    pub fn new_writing(language: &str, title: &str, text: &str) -> Self {
        ContentItem::Writing {
            id: new_id(),
            language: language.to_string(),
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    pub fn new_spotify_item(language: &str, title: &str, spotify_uri: &str, media: SpotifyKind) -> Self {
        ContentItem::SpotifyItem {
            id: new_id(),
            language: language.to_string(),
            title: title.to_string(),
            spotify_uri: spotify_uri.to_string(),
            media,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentItem::Story { id, .. }
            | ContentItem::YoutubeVideo { id, .. }
            | ContentItem::Writing { id, .. }
            | ContentItem::SpotifyItem { id, .. } => id,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            ContentItem::Story { language, .. }
            | ContentItem::YoutubeVideo { language, .. }
            | ContentItem::Writing { language, .. }
            | ContentItem::SpotifyItem { language, .. } => language,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Story { title, .. }
            | ContentItem::YoutubeVideo { title, .. }
            | ContentItem::Writing { title, .. }
            | ContentItem::SpotifyItem { title, .. } => title,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Story { .. } => ContentKind::Story,
            ContentItem::YoutubeVideo { .. } => ContentKind::YoutubeVideo,
            ContentItem::Writing { .. } => ContentKind::Writing,
            ContentItem::SpotifyItem { .. } => ContentKind::SpotifyItem,
        }
    }

    pub fn collection(&self) -> Collection {
        self.kind().collection()
    }

    /// Readable text of the item, if it has any
    pub fn body_text(&self) -> Option<String> {
        match self {
            ContentItem::Story { text, .. } | ContentItem::Writing { text, .. } => Some(text.clone()),
            ContentItem::YoutubeVideo { transcript, .. } if !transcript.is_empty() => Some(
                transcript
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}
