use chrono::Utc;
use intongues_core::DeckId;
use intongues_review::ReviewSession;
use intongues_types::{AppEvent, OutputLine, ReviewMode, ReviewQuality, VocabStatus};
use kanal::AsyncSender;

use crate::events::show;

async fn show_current(
    session: &ReviewSession,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let line = match session.front() {
        Some(front) => OutputLine::Card {
            front,
            remaining: session.remaining(),
            play_audio: session.plays_audio_on_show(),
        },
        None => OutputLine::Info(format!(
            "Nothing left to review ({} answered)",
            session.answered().len()
        )),
    };
    show(app_to_cli_tx, line).await
}

pub async fn handle_select_deck(
    session: &mut ReviewSession,
    deck: &str,
    mode: ReviewMode,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let deck: DeckId = deck.parse()?;
    session.select_deck(deck.clone(), mode);

    let count = session.load(Utc::now()).await?;
    show(
        app_to_cli_tx,
        OutputLine::Info(format!("{count} cards in {deck} ({mode})")),
    )
    .await?;
    show_current(session, app_to_cli_tx).await
}

pub async fn handle_reveal(
    session: &mut ReviewSession,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let outcome = session.reveal()?;
    let back = session.back().unwrap_or_default();

    show(
        app_to_cli_tx,
        OutputLine::Answer {
            back,
            play_audio: outcome.play_audio,
        },
    )
    .await
}

pub async fn handle_skip(
    session: &mut ReviewSession,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    session.skip()?;
    show_current(session, app_to_cli_tx).await
}

pub async fn handle_answer(
    session: &mut ReviewSession,
    quality: ReviewQuality,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entry = session.answer(quality, Utc::now()).await?;

    let next = entry
        .due_at()
        .map(|due| due.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    show(
        app_to_cli_tx,
        OutputLine::Info(format!("{}: {}, next review {next}", entry.text, entry.status)),
    )
    .await?;

    show_current(session, app_to_cli_tx).await
}

pub async fn handle_correct_status(
    session: &mut ReviewSession,
    status: VocabStatus,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entry = session.correct_status(status).await?;
    show(
        app_to_cli_tx,
        OutputLine::Info(format!("{} marked {}", entry.text, entry.status)),
    )
    .await
}
