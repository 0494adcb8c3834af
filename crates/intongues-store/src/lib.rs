use std::path::{Path, PathBuf};
use std::sync::Arc;

use intongues_config::store::{StoreBackend, StoreConfig};

pub mod content;
pub mod document;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod stats;
pub mod vocab;

pub use content::ContentLibrary;
pub use document::{ChangeEvent, ChangeKind, CollectionPath, DocumentStore, FieldFilter, Subscription};
pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use stats::{DailyReviewStats, ReviewStatsStore};
pub use vocab::VocabStore;

/// Open the configured backend, `fallback_dir` is used when no data dir is set
pub fn open_store(config: &StoreConfig, fallback_dir: &Path) -> Arc<dyn DocumentStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, nothing will be persisted");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Json => {
            let root = config
                .data_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| fallback_dir.to_path_buf());
            tracing::info!("Using JSON store at {}", root.display());
            Arc::new(JsonFileStore::new(root))
        }
    }
}
