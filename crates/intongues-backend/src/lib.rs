mod client;

pub use client::BackendClient;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate a word or phrase from source to target language
    async fn translate_phrase(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, BackendError>;

    /// Ask the provider to warm its cache for upcoming words, returns how many it accepted
    async fn prefetch_translations(
        &self,
        words: &[String],
        from: &str,
        to: &str,
    ) -> Result<usize, BackendError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Non-success status, with the `message` field of the body when present
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    #[error("Backend is disabled")]
    Disabled,
}
