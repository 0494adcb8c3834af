use intongues_review::ReviewSession;
use intongues_types::{AppEvent, OutputLine};
use kanal::AsyncSender;

use crate::events::show;
use crate::state::AppState;

pub async fn handle_reset_progress(
    state: &AppState,
    session: &mut ReviewSession,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (user_id, language, _) = state.scope().await;
    let removed = state.vocab.reset_vocab_progress(&user_id, &language).await?;

    // Queued cards point at deleted entries
    *session = state.review_session().await;

    show(
        app_to_cli_tx,
        OutputLine::Info(format!("Removed {removed} entries for {language}")),
    )
    .await
}
