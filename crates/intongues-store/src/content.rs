use std::sync::Arc;

use intongues_types::{ContentItem, ContentKind};

use crate::document::{CollectionPath, DocumentStore, FieldFilter};
use crate::error::StoreError;

/// Stories, videos, writing pieces and Spotify items, one collection per kind
#[derive(Clone)]
pub struct ContentLibrary {
    docs: Arc<dyn DocumentStore>,
}

impl ContentLibrary {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    fn path(user_id: &str, kind: ContentKind) -> CollectionPath {
        CollectionPath::new(user_id, kind.collection())
    }

    pub async fn save(&self, user_id: &str, item: &ContentItem) -> Result<(), StoreError> {
        self.docs
            .set(
                &Self::path(user_id, item.kind()),
                item.id(),
                serde_json::to_value(item)?,
            )
            .await?;

        tracing::debug!("Saved {} '{}' ({})", item.collection(), item.title(), item.id());
        Ok(())
    }

    pub async fn get(
        &self,
        user_id: &str,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<ContentItem>, StoreError> {
        let doc = self.docs.get(&Self::path(user_id, kind), id).await?;
        Ok(doc.map(serde_json::from_value::<ContentItem>).transpose()?)
    }

    /// Every item of the language across all kinds, sorted by title
    pub async fn list(&self, user_id: &str, language: &str) -> Result<Vec<ContentItem>, StoreError> {
        let mut items = Vec::new();

        for kind in ContentKind::ALL {
            let docs = self
                .docs
                .query(&Self::path(user_id, kind), &FieldFilter::eq("language", language))
                .await?;

            for (id, doc) in docs {
                match serde_json::from_value::<ContentItem>(doc) {
                    Ok(item) => items.push(item),
                    Err(e) => tracing::warn!("Skipping malformed {} document {id}: {e}", kind.collection()),
                }
            }
        }

        items.sort_by(|a, b| a.title().cmp(b.title()).then_with(|| a.id().cmp(b.id())));
        Ok(items)
    }

    pub async fn delete(&self, user_id: &str, kind: ContentKind, id: &str) -> Result<bool, StoreError> {
        self.docs.delete(&Self::path(user_id, kind), id).await
    }
}
