use intongues_core::{Highlighter, TokenKind, new_words, vocab_coverage};
use intongues_types::{AppEvent, OutputLine};
use kanal::AsyncSender;

use crate::events::show;
use crate::state::AppState;

pub async fn handle_highlight_text(
    state: &AppState,
    text: &str,
    app_to_cli_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (user_id, language, native_language) = state.scope().await;
    let vocab = state.vocab.load_user_vocab(&user_id, &language).await;

    let tokens = Highlighter::new(&vocab).tokenize(text);
    tracing::debug!("Tokenized into {} tokens", tokens.len());

    for token in tokens.iter().filter(|t| t.kind != TokenKind::Separator) {
        let highlight = token.highlight();
        let class = match highlight.css_class() {
            "" => "plain",
            class => class,
        };
        show(
            app_to_cli_tx,
            OutputLine::Info(format!(
                "{:<24} {:<16} {:.2}",
                token.text,
                class,
                highlight.opacity()
            )),
        )
        .await?;
    }

    let unseen = new_words(&tokens);
    show(
        app_to_cli_tx,
        OutputLine::Info(format!(
            "coverage {:.0}%, {} new",
            vocab_coverage(&tokens) * 100.0,
            unseen.len()
        )),
    )
    .await?;

    // Warm the backend cache for words the reader is likely to click next
    if let Some(translator) = &state.translator {
        match translator
            .prefetch_translations(&unseen, &language, &native_language)
            .await
        {
            Ok(count) => tracing::debug!("Prefetched {count} translations"),
            Err(e) => tracing::warn!("Prefetch failed: {e}"),
        }
    }

    Ok(())
}
