use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{ChangeFeed, ChangeKind, CollectionPath, DocumentStore, FieldFilter, Subscription};
use crate::error::StoreError;

/// Volatile store, used for tests and throwaway sessions
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionPath, BTreeMap<String, Value>>>,
    changes: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            changes: ChangeFeed::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(path).and_then(|docs| docs.get(id)).cloned())
    }

    async fn set(&self, path: &CollectionPath, id: &str, doc: Value) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(path.clone())
                .or_default()
                .insert(id.to_string(), doc);
        }
        self.changes.publish(path, id, ChangeKind::Set);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(path)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            self.changes.publish(path, id, ChangeKind::Delete);
        }
        Ok(removed)
    }

    async fn delete_where(&self, path: &CollectionPath, filter: &FieldFilter) -> Result<usize, StoreError> {
        let removed: Vec<String> = {
            let mut collections = self.collections.write().await;
            let Some(docs) = collections.get_mut(path) else {
                return Ok(0);
            };
            let ids: Vec<String> = docs
                .iter()
                .filter(|(_, doc)| filter.matches(doc))
                .map(|(id, _)| id.clone())
                .collect();
            for id in &ids {
                docs.remove(id);
            }
            ids
        };

        for id in &removed {
            self.changes.publish(path, id, ChangeKind::Delete);
        }
        Ok(removed.len())
    }

    async fn query(
        &self,
        path: &CollectionPath,
        filter: &FieldFilter,
    ) -> Result<Vec<(String, Value)>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(path) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect())
    }

    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        self.changes.subscribe(path)
    }

    fn listener_count(&self) -> usize {
        self.changes.listener_count()
    }
}
