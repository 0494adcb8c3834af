use intongues_core::normalise;
use intongues_store::StoreError;
use intongues_types::{AppEvent, OutputLine};
use kanal::AsyncSender;

use crate::events::show;
use crate::state::AppState;

pub async fn handle_translate_phrase(
    state: &AppState,
    phrase: &str,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(translator) = &state.translator else {
        anyhow::bail!("Backend disabled, no translator available");
    };
    if normalise(phrase).is_empty() {
        anyhow::bail!("Nothing to translate");
    }

    let (user_id, language, native_language) = state.scope().await;
    let translation = translator
        .translate_phrase(phrase, &language, &native_language)
        .await?;

    // Only entries already in the vocabulary keep the translation
    match state
        .vocab
        .set_translation(&user_id, &language, phrase, &translation.text)
        .await
    {
        Ok(entry) => tracing::debug!("Cached translation on '{}'", entry.normalised),
        Err(StoreError::NotFound(_)) => tracing::debug!("'{phrase}' not saved, translation not cached"),
        Err(e) => return Err(e.into()),
    }

    show(
        app_to_cli_tx,
        OutputLine::Info(format!("{phrase} = {}", translation.text)),
    )
    .await
}
