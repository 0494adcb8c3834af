use std::path::Path;
use std::sync::Arc;

use intongues_backend::{BackendClient, Translator};
use intongues_config::Config;
use intongues_core::Scheduler;
use intongues_review::ReviewSession;
use intongues_store::{DocumentStore, ReviewStatsStore, VocabStore, open_store};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub vocab: VocabStore,
    pub stats: ReviewStatsStore,
    /// `None` when the backend is disabled or the client failed to build
    pub translator: Option<Arc<dyn Translator>>,
}

impl AppState {
    pub fn new(config: Config, fallback_data_dir: &Path) -> Self {
        let docs = open_store(&config.store, fallback_data_dir);

        let translator: Option<Arc<dyn Translator>> = if config.backend.enabled {
            match BackendClient::new(config.backend.clone()) {
                Ok(client) => {
                    let metadata = client.metadata();
                    tracing::info!("Translations via {} at {}", metadata.name, metadata.base_url);
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!("Failed to initialize backend client: {e}");
                    None
                }
            }
        } else {
            tracing::warn!("Backend disabled, translations unavailable");
            None
        };

        Self::with_store(config, docs, translator)
    }

    pub fn with_store(
        config: Config,
        docs: Arc<dyn DocumentStore>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        let scheduler = Scheduler::new(config.srs.clone());

        Self {
            vocab: VocabStore::new(docs.clone(), scheduler),
            stats: ReviewStatsStore::new(docs),
            translator,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Fresh session on the shelves for the configured user and language
    pub async fn review_session(&self) -> ReviewSession {
        let config = self.config.read().await;
        ReviewSession::new(
            self.vocab.clone(),
            self.stats.clone(),
            &config.user_id,
            &config.language,
            config.review.default_mode,
            config.review.auto_play_audio,
        )
    }

    /// `(user_id, language, native_language)`
    pub async fn scope(&self) -> (String, String, String) {
        let config = self.config.read().await;
        (
            config.user_id.clone(),
            config.language.clone(),
            config.native_language.clone(),
        )
    }
}
