use std::sync::Arc;

use intongues_review::ReviewSession;
use intongues_types::{AppEvent, OutputLine};
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod highlight_text;
pub mod mark_word;
pub mod reset_progress;
pub mod review;
pub mod translate_phrase;

use highlight_text::handle_highlight_text;
use mark_word::handle_mark_word;
use reset_progress::handle_reset_progress;
use review::{handle_answer, handle_correct_status, handle_reveal, handle_select_deck, handle_skip};
use translate_phrase::handle_translate_phrase;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    cli_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_cli_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut session = state.review_session().await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            biased;
            event = cli_to_app_rx.recv() => event?,
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
        };

        if let AppEvent::Shutdown = event {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            break;
        }

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", event);
        if let Err(e) = handle_events(&state, &mut session, &app_to_cli_tx, event).await {
            tracing::error!("Event failed: {e:#}");
            show(&app_to_cli_tx, OutputLine::Error(format!("{e:#}"))).await?;
        }
    }

    Ok(())
}

/// Queue one line for the output loop
pub async fn show(app_to_cli_tx: &AsyncSender<AppEvent>, line: OutputLine) -> anyhow::Result<()> {
    app_to_cli_tx.send(AppEvent::ShowOutput(line)).await?;
    Ok(())
}

async fn handle_events(
    state: &AppState,
    session: &mut ReviewSession,
    app_to_cli_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::HighlightText(text) => {
            handle_highlight_text(state, &text, app_to_cli_tx).await?;
        }
        AppEvent::MarkWord {
            word,
            status,
            translation,
            content_id,
        } => {
            handle_mark_word(
                state,
                &word,
                status,
                translation.as_deref(),
                content_id.as_deref(),
                app_to_cli_tx,
            )
            .await?;
        }
        AppEvent::TranslatePhrase(phrase) => {
            handle_translate_phrase(state, &phrase, app_to_cli_tx).await?;
        }
        AppEvent::SelectDeck { deck, mode } => {
            handle_select_deck(session, &deck, mode, app_to_cli_tx).await?;
        }
        AppEvent::Reveal => handle_reveal(session, app_to_cli_tx).await?,
        AppEvent::Skip => handle_skip(session, app_to_cli_tx).await?,
        AppEvent::Answer(quality) => handle_answer(session, quality, app_to_cli_tx).await?,
        AppEvent::CorrectStatus(status) => {
            handle_correct_status(session, status, app_to_cli_tx).await?;
        }
        AppEvent::ResetProgress => {
            handle_reset_progress(state, session, app_to_cli_tx).await?;
        }
        AppEvent::ShowOutput(_) => {
            // Output-only event, ignore in the event loop
        }
        AppEvent::Shutdown => {}
    }

    Ok(())
}
