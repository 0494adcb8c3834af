use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::document::{ChangeFeed, ChangeKind, CollectionPath, DocumentStore, FieldFilter, Subscription};
use crate::error::StoreError;

type Documents = BTreeMap<String, Value>;

/// Store persisting each user collection as one pretty-printed JSON file:
/// `{root}/{user}/{collection}.json`
pub struct JsonFileStore {
    root: PathBuf,
    /// Serialises read-modify-write cycles
    write_lock: Mutex<()>,
    changes: ChangeFeed,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
            changes: ChangeFeed::new(),
        }
    }

    fn file_path(&self, path: &CollectionPath) -> PathBuf {
        self.root
            .join(encode_segment(&path.user_id))
            .join(format!("{}.json", path.collection))
    }

    async fn read_documents(&self, path: &CollectionPath) -> Result<Documents, StoreError> {
        let file = self.file_path(path);

        match fs::read_to_string(&file).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Documents::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_documents(&self, path: &CollectionPath, docs: &Documents) -> Result<(), StoreError> {
        let file = self.file_path(path);
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir).await?;
        }

        // Write then rename so a crash never leaves a truncated file
        let tmp = file.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(docs)?).await?;
        fs::rename(&tmp, &file).await?;

        tracing::trace!("Wrote {} documents to {}", docs.len(), file.display());
        Ok(())
    }
}

/// Percent-encode a user id into one directory name. Distinct ids always map
/// to distinct names, and `.`/`..` cannot escape the data directory.
fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).replace('.', "%2E")
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Value>, StoreError> {
        let mut docs = self.read_documents(path).await?;
        Ok(docs.remove(id))
    }

    async fn set(&self, path: &CollectionPath, id: &str, doc: Value) -> Result<(), StoreError> {
        {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read_documents(path).await?;
            docs.insert(id.to_string(), doc);
            self.write_documents(path, &docs).await?;
        }
        self.changes.publish(path, id, ChangeKind::Set);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read_documents(path).await?;
            let removed = docs.remove(id).is_some();
            if removed {
                self.write_documents(path, &docs).await?;
            }
            removed
        };
        if removed {
            self.changes.publish(path, id, ChangeKind::Delete);
        }
        Ok(removed)
    }

    async fn delete_where(&self, path: &CollectionPath, filter: &FieldFilter) -> Result<usize, StoreError> {
        let removed: Vec<String> = {
            let _guard = self.write_lock.lock().await;
            let mut docs = self.read_documents(path).await?;
            let ids: Vec<String> = docs
                .iter()
                .filter(|(_, doc)| filter.matches(doc))
                .map(|(id, _)| id.clone())
                .collect();
            if !ids.is_empty() {
                for id in &ids {
                    docs.remove(id);
                }
                self.write_documents(path, &docs).await?;
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
        let docs = self.read_documents(path).await?;
        Ok(docs
            .into_iter()
            .filter(|(_, doc)| filter.matches(doc))
            .collect())
    }

    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        self.changes.subscribe(path)
    }

    fn listener_count(&self) -> usize {
        self.changes.listener_count()
    }
}
