use std::fmt;

use async_trait::async_trait;
use intongues_types::Collection;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::StoreError;

const CHANGE_FEED_CAPACITY: usize = 256;

/// A user-scoped collection, e.g. `users/{uid}/vocab`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    pub user_id: String,
    pub collection: Collection,
}

impl CollectionPath {
    pub fn new(user_id: &str, collection: Collection) -> Self {
        Self {
            user_id: user_id.to_string(),
            collection,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.user_id, self.collection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    All,
    /// Top-level field equals the value
    Eq(String, Value),
}

impl FieldFilter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        FieldFilter::Eq(field.to_string(), value.into())
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Eq(field, value) => doc.get(field) == Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: CollectionPath,
    pub id: String,
    pub kind: ChangeKind,
}

/// Live feed of changes to one collection. Dropping it unsubscribes.
pub struct Subscription {
    path: CollectionPath,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Next change in the subscribed collection, `None` once the store is gone
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.path == self.path => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscription to {} skipped {} changes", self.path, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }
}

/// Broadcast side shared by the store backends
pub(crate) struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { tx }
    }

    pub(crate) fn publish(&self, path: &CollectionPath, id: &str, kind: ChangeKind) {
        // No receivers is fine
        let _ = self.tx.send(ChangeEvent {
            path: path.clone(),
            id: id.to_string(),
            kind,
        });
    }

    pub(crate) fn subscribe(&self, path: &CollectionPath) -> Subscription {
        Subscription {
            path: path.clone(),
            rx: self.tx.subscribe(),
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Document database holding JSON documents in user-scoped collections.
///
/// Writes are create-or-replace with no transactions; concurrent writers to the
/// same document resolve as last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, path: &CollectionPath, id: &str, doc: Value) -> Result<(), StoreError>;

    /// Returns whether a document was removed
    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError>;

    /// Remove every matching document in one write, returning how many went
    async fn delete_where(&self, path: &CollectionPath, filter: &FieldFilter) -> Result<usize, StoreError>;

    /// Matching documents ordered by id
    async fn query(
        &self,
        path: &CollectionPath,
        filter: &FieldFilter,
    ) -> Result<Vec<(String, Value)>, StoreError>;

    fn subscribe(&self, path: &CollectionPath) -> Subscription;

    /// Number of live subscriptions across all collections
    fn listener_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn eq_filter_compares_top_level_field() {
        let doc = json!({ "language": "es", "status": "known" });
        assert!(FieldFilter::eq("language", "es").matches(&doc));
        assert!(!FieldFilter::eq("language", "fr").matches(&doc));
        assert!(!FieldFilter::eq("missing", "es").matches(&doc));
        assert!(FieldFilter::All.matches(&doc));
    }

    #[test]
    fn path_displays_like_a_document_path() {
        let path = CollectionPath::new("u1", Collection::YoutubeVideos);
        assert_eq!(path.to_string(), "users/u1/youtubeVideos");
    }
}
