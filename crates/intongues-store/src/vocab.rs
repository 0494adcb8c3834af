use std::sync::Arc;

use chrono::{DateTime, Utc};
use intongues_core::{DeckId, Scheduler, VocabMap, normalise};
use intongues_types::{Collection, ReviewCard, ReviewMode, ReviewQuality, VocabEntry, VocabStatus};

use crate::document::{CollectionPath, DocumentStore, FieldFilter, Subscription};
use crate::error::StoreError;

/// Per-user, per-language vocabulary on top of a document store.
///
/// Document ids are `{language}:{normalised}`, so one expression can only ever
/// have one document per user and language.
#[derive(Clone)]
pub struct VocabStore {
    docs: Arc<dyn DocumentStore>,
    scheduler: Scheduler,
}

impl VocabStore {
    pub fn new(docs: Arc<dyn DocumentStore>, scheduler: Scheduler) -> Self {
        Self { docs, scheduler }
    }

    fn path(user_id: &str) -> CollectionPath {
        CollectionPath::new(user_id, Collection::Vocab)
    }

    pub fn doc_id(language: &str, normalised: &str) -> String {
        format!("{language}:{normalised}")
    }

    fn key_for(word: &str) -> Result<String, StoreError> {
        let normalised = normalise(word);
        if normalised.is_empty() {
            return Err(StoreError::InvalidExpression(word.to_string()));
        }
        Ok(normalised)
    }

    async fn get_entry(
        &self,
        user_id: &str,
        language: &str,
        normalised: &str,
    ) -> Result<Option<VocabEntry>, StoreError> {
        let doc = self
            .docs
            .get(&Self::path(user_id), &Self::doc_id(language, normalised))
            .await?;

        Ok(doc.map(serde_json::from_value::<VocabEntry>).transpose()?)
    }

    async fn put_entry(&self, user_id: &str, entry: &VocabEntry) -> Result<(), StoreError> {
        self.docs
            .set(
                &Self::path(user_id),
                &Self::doc_id(&entry.language, &entry.normalised),
                serde_json::to_value(entry)?,
            )
            .await
    }

    async fn load_entries(&self, user_id: &str, language: &str) -> Result<Vec<VocabEntry>, StoreError> {
        let docs = self
            .docs
            .query(&Self::path(user_id), &FieldFilter::eq("language", language))
            .await?;

        let entries = docs
            .into_iter()
            .filter_map(|(id, doc)| match serde_json::from_value::<VocabEntry>(doc) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping malformed vocab document {id}: {e}");
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    /// All entries of a language. Read failures are logged and yield an empty
    /// map so callers fall back to rendering without highlights.
    pub async fn load_user_vocab(&self, user_id: &str, language: &str) -> VocabMap {
        match self.load_entries(user_id, language).await {
            Ok(entries) => {
                tracing::debug!("Loaded {} vocab entries for {user_id}/{language}", entries.len());
                entries.into_iter().collect()
            }
            Err(e) => {
                tracing::error!("Failed to load vocab for {user_id}/{language}: {e}");
                VocabMap::new()
            }
        }
    }

    /// Create or update one entry. A `None` translation keeps the cached one.
    pub async fn upsert_vocab_entry(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        translation: Option<&str>,
        status: VocabStatus,
    ) -> Result<VocabEntry, StoreError> {
        self.upsert(user_id, language, word, translation, status, None).await
    }

    /// Upsert and remember which content item the expression was saved from
    pub async fn upsert_vocab_entry_from_content(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        translation: Option<&str>,
        status: VocabStatus,
        content_id: &str,
    ) -> Result<VocabEntry, StoreError> {
        self.upsert(user_id, language, word, translation, status, Some(content_id))
            .await
    }

    async fn upsert(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        translation: Option<&str>,
        status: VocabStatus,
        content_id: Option<&str>,
    ) -> Result<VocabEntry, StoreError> {
        let normalised = Self::key_for(word)?;
        let now = Utc::now();

        let entry = match self.get_entry(user_id, language, &normalised).await? {
            Some(mut entry) => {
                entry.status = status;
                if let Some(translation) = translation {
                    entry.translation = Some(translation.to_string());
                }
                if let Some(content_id) = content_id {
                    entry.content_ids.insert(content_id.to_string());
                }
                entry.updated_at = now;
                entry
            }
            None => VocabEntry {
                text: word.trim().to_string(),
                normalised,
                language: language.to_string(),
                status,
                translation: translation.map(str::to_string),
                content_ids: content_id.map(str::to_string).into_iter().collect(),
                srs: None,
                created_at: now,
                updated_at: now,
            },
        };

        self.put_entry(user_id, &entry).await?;
        tracing::debug!("Upserted '{}' ({}) as {}", entry.normalised, language, entry.status);

        Ok(entry)
    }

    /// Status-only change, scheduling state is left alone
    pub async fn set_vocab_status(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        status: VocabStatus,
    ) -> Result<VocabEntry, StoreError> {
        self.upsert(user_id, language, word, None, status, None).await
    }

    /// Cache a translation without touching status
    pub async fn set_translation(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        translation: &str,
    ) -> Result<VocabEntry, StoreError> {
        let normalised = Self::key_for(word)?;
        let mut entry = self
            .get_entry(user_id, language, &normalised)
            .await?
            .ok_or_else(|| StoreError::NotFound(Self::doc_id(language, &normalised)))?;

        entry.translation = Some(translation.to_string());
        entry.updated_at = Utc::now();
        self.put_entry(user_id, &entry).await?;

        Ok(entry)
    }

    /// Apply a review response to the entry's schedule and status
    pub async fn update_vocab_srs(
        &self,
        user_id: &str,
        language: &str,
        word: &str,
        quality: ReviewQuality,
        mode: ReviewMode,
        now: DateTime<Utc>,
    ) -> Result<VocabEntry, StoreError> {
        let normalised = Self::key_for(word)?;
        let mut entry = self
            .get_entry(user_id, language, &normalised)
            .await?
            .ok_or_else(|| StoreError::NotFound(Self::doc_id(language, &normalised)))?;

        self.scheduler.review(&mut entry, quality, mode, now);
        self.put_entry(user_id, &entry).await?;

        Ok(entry)
    }

    fn into_cards(mut entries: Vec<VocabEntry>) -> Vec<ReviewCard> {
        entries.sort_by(|a, b| {
            let a_due = a.due_at().unwrap_or(a.created_at);
            let b_due = b.due_at().unwrap_or(b.created_at);
            a_due.cmp(&b_due).then_with(|| a.normalised.cmp(&b.normalised))
        });
        entries.iter().map(VocabEntry::to_card).collect()
    }

    pub async fn load_due_cards(
        &self,
        user_id: &str,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewCard>, StoreError> {
        let entries = self.load_entries(user_id, language).await?;
        Ok(Self::into_cards(
            entries.into_iter().filter(|e| e.is_due(now)).collect(),
        ))
    }

    pub async fn load_cards_by_status(
        &self,
        user_id: &str,
        language: &str,
        status: VocabStatus,
    ) -> Result<Vec<ReviewCard>, StoreError> {
        let entries = self.load_entries(user_id, language).await?;
        Ok(Self::into_cards(
            entries.into_iter().filter(|e| e.status == status).collect(),
        ))
    }

    pub async fn load_due_cards_by_content_id(
        &self,
        user_id: &str,
        language: &str,
        content_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewCard>, StoreError> {
        let entries = self.load_entries(user_id, language).await?;
        Ok(Self::into_cards(
            entries
                .into_iter()
                .filter(|e| e.content_ids.contains(content_id) && e.is_due(now))
                .collect(),
        ))
    }

    pub async fn load_deck(
        &self,
        user_id: &str,
        language: &str,
        deck: &DeckId,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewCard>, StoreError> {
        match deck {
            DeckId::AnyDue => self.load_due_cards(user_id, language, now).await,
            DeckId::ByStatus(status) => self.load_cards_by_status(user_id, language, *status).await,
            DeckId::Content(id) => {
                self.load_due_cards_by_content_id(user_id, language, id, now)
                    .await
            }
        }
    }

    /// Delete every entry of the language, returning how many were removed
    pub async fn reset_vocab_progress(&self, user_id: &str, language: &str) -> Result<usize, StoreError> {
        let deleted = self
            .docs
            .delete_where(&Self::path(user_id), &FieldFilter::eq("language", language))
            .await?;

        tracing::info!("Reset {deleted} vocab entries for {user_id}/{language}");
        Ok(deleted)
    }

    /// Live changes to the user's vocabulary
    pub fn subscribe(&self, user_id: &str) -> Subscription {
        self.docs.subscribe(&Self::path(user_id))
    }
}
