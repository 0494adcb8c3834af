use intongues_types::{AppEvent, OutputLine, VocabStatus};
use kanal::AsyncSender;

use crate::events::show;
use crate::state::AppState;

pub async fn handle_mark_word(
    state: &AppState,
    word: &str,
    status: VocabStatus,
    translation: Option<&str>,
    content_id: Option<&str>,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (user_id, language, _) = state.scope().await;

    let entry = match content_id {
        Some(content_id) => {
            state
                .vocab
                .upsert_vocab_entry_from_content(
                    &user_id,
                    &language,
                    word,
                    translation,
                    status,
                    content_id,
                )
                .await?
        }
        None => {
            state
                .vocab
                .upsert_vocab_entry(&user_id, &language, word, translation, status)
                .await?
        }
    };

    let line = match &entry.translation {
        Some(translation) => format!("{} ({translation}) -> {}", entry.text, entry.status),
        None => format!("{} -> {}", entry.text, entry.status),
    };
    show(app_to_cli_tx, OutputLine::Info(line)).await
}
