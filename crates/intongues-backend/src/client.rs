use std::time::Duration;

use async_trait::async_trait;
use intongues_config::backend::BackendConfig;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{BackendError, ProviderMetadata, Translation, Translator};

const TRANSLATE_PHRASE: &str = "/api/translatePhrase";
const PREFETCH_TRANSLATIONS: &str = "/api/prefetchTranslations";

/// JSON client for the external REST backend
#[derive(Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    /// POST a JSON body and return the JSON reply
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, BackendError> {
        if !self.config.enabled {
            return Err(BackendError::Disabled);
        }

        let url = self.config.endpoint(path);
        tracing::debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::HttpError {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| status.to_string()),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Best-effort `message` from an error body, falling back to the raw text
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => json
            .get("message")
            .or_else(|| json.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl Translator for BackendClient {
    async fn translate_phrase(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, BackendError> {
        let reply = self
            .post(
                TRANSLATE_PHRASE,
                &json!({
                    "phrase": text,
                    "sourceLanguage": from,
                    "targetLanguage": to,
                }),
            )
            .await?;

        let translated = reply["translation"]
            .as_str()
            .ok_or(BackendError::MissingField("translation"))?;

        Ok(Translation {
            text: translated.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            provider: "intongues-backend".to_string(),
        })
    }

    async fn prefetch_translations(
        &self,
        words: &[String],
        from: &str,
        to: &str,
    ) -> Result<usize, BackendError> {
        if words.is_empty() {
            return Ok(0);
        }

        let reply = self
            .post(
                PREFETCH_TRANSLATIONS,
                &json!({
                    "words": words,
                    "sourceLanguage": from,
                    "targetLanguage": to,
                }),
            )
            .await?;

        Ok(reply["count"].as_u64().map(|c| c as usize).unwrap_or(words.len()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "intongues-backend".to_string(),
            base_url: self.config.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP response and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            // Headers and the small JSON body arrive together in practice
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.to_lowercase().strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap_or(0)))
                        .unwrap_or(0);
                    if request.len() >= split + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn client(base_url: String) -> BackendClient {
        BackendClient::new(BackendConfig {
            enabled: true,
            base_url,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn translate_phrase_posts_json() {
        let (url, server) = serve_once("200 OK", r#"{"translation":"good morning"}"#).await;

        let translation = client(url)
            .translate_phrase("buenos días", "es", "en")
            .await
            .unwrap();
        assert_eq!(translation.text, "good morning");
        assert_eq!(translation.from, "es");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/translatePhrase"));
        assert!(request.contains(r#""sourceLanguage":"es""#));
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let (url, _server) = serve_once("500 Internal Server Error", r#"{"message":"quota exceeded"}"#).await;

        let err = client(url)
            .translate_phrase("hola", "es", "en")
            .await
            .unwrap_err();
        match err {
            BackendError::HttpError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn disabled_backend_short_circuits() {
        let client = BackendClient::new(BackendConfig {
            enabled: false,
            ..BackendConfig::default()
        })
        .unwrap();

        assert!(matches!(
            client.translate_phrase("hola", "es", "en").await,
            Err(BackendError::Disabled)
        ));
        assert_eq!(client.prefetch_translations(&[], "es", "en").await.unwrap(), 0);
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(error_message(r#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message(r#"{"error":"bad"}"#).as_deref(), Some("bad"));
        assert_eq!(error_message("plain failure").as_deref(), Some("plain failure"));
        assert_eq!(error_message("  "), None);
    }
}
