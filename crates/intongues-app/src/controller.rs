use std::sync::Arc;

use intongues_types::AppEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::AsyncBufRead;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{input_loop, output_loop};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_cli: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub cli_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            // Highlight output can burst one line per token
            app_to_cli: kanal::bounded_async(capacity * 4),
            cli_to_app: kanal::bounded_async(capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, capacity: usize) -> Self {
        Self {
            channels: ChannelSet::new(capacity),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawn the event and output loops and queue `first_event`.
    ///
    /// With `input`, a reader task is spawned only after `first_event` is
    /// queued so typed commands always follow it. Without `input` the run
    /// ends once `first_event` is handled.
    pub async fn start<R>(
        &self,
        first_event: AppEvent,
        input: Option<R>,
    ) -> anyhow::Result<JoinSet<anyhow::Result<()>>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.cli_to_app.1.clone(),
            self.channels.app_to_cli.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(output_loop(
            self.channels.app_to_cli.1.clone(),
            self.cancel_token.child_token(),
        ));

        let sender = self.channels.cli_to_app.0.clone();
        sender.send(first_event).await?;

        match input {
            Some(reader) => {
                tasks.spawn(input_loop(reader, sender, self.cancel_token.child_token()));
            }
            None => sender.send(AppEvent::Shutdown).await?,
        }

        Ok(tasks)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
