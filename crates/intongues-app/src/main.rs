use std::sync::Arc;

use clap::{Parser, Subcommand};
use intongues_config::log::LogConfig;
use intongues_config::review::ReviewConfig;
use intongues_types::{AppEvent, ReviewMode, VocabStatus};
use tokio::io::BufReader;
use tokio::signal;
use tokio::task::JoinError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;


use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "intongues")]
#[command(about = "Vocabulary highlighting and spaced review")]
struct Cli {
    /// User whose vocabulary is read and written
    #[arg(long, global = true)]
    user: Option<String>,
    /// Target language code
    #[arg(long, global = true)]
    language: Option<String>,
    #[arg(long, global = true, default_value = "main")]
    profile: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize text and show each word's highlight
    Highlight { text: String },

    /// Save a word or phrase with a status
    Mark {
        word: String,
        status: VocabStatus,
        #[arg(long)]
        translation: Option<String>,
        /// Content item the word was read in
        #[arg(long)]
        content: Option<String>,
    },

    /// Review a deck interactively
    Review {
        /// `core:any`, `core:<status>` or `content:<id>`
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        mode: Option<ReviewMode>,
    },

    /// Delete all vocabulary of the language
    Reset,

    /// Translate a phrase through the backend
    Translate { phrase: String },
}

impl Command {
    fn is_interactive(&self) -> bool {
        matches!(self, Command::Review { .. })
    }

    fn into_event(self, review: &ReviewConfig) -> AppEvent {
        match self {
            Command::Highlight { text } => AppEvent::HighlightText(text),
            Command::Mark {
                word,
                status,
                translation,
                content,
            } => AppEvent::MarkWord {
                word,
                status,
                translation,
                content_id: content,
            },
            Command::Review { deck, mode } => AppEvent::SelectDeck {
                deck: deck.unwrap_or_else(|| review.default_deck.clone()),
                mode: mode.unwrap_or(review.default_mode),
            },
            Command::Reset => AppEvent::ResetProgress,
            Command::Translate { phrase } => AppEvent::TranslatePhrase(phrase),
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout belongs to command output
    if log.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn log_task_exit(result: Result<anyhow::Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Task exited with error: {e:#}"),
        Err(e) => tracing::error!("Task panicked: {e}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let root = profile::app_root()?;
    let created_main = profile::init_user_config(&root)?;
    let created_profile = if profile::profile_path(&root, &cli.profile)?.exists() {
        None
    } else {
        Some(profile::add_profile_from_default(&root, &cli.profile)?)
    };

    let mut config = profile::load_user_profile(&root, &cli.profile)?;
    if let Some(user) = cli.user {
        config.user_id = user;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }

    config.validate()?;

    init_tracing(&config.log);
    if let Some(path) = created_main {
        tracing::info!("Created main profile at {}", path.display());
    }
    if let Some(path) = created_profile {
        tracing::info!("Created profile {} at {}", cli.profile, path.display());
    }
    tracing::info!(
        "Profile {} for {}/{}",
        cli.profile,
        config.user_id,
        config.language
    );

    let capacity = config.channel_capacity;
    let interactive = cli.command.is_interactive();
    let first_event = cli.command.into_event(&config.review);

    let state = Arc::new(AppState::new(config, &profile::data_dir(&root)));
    let controller = AppController::new(state, capacity);
    let input = interactive.then(|| BufReader::new(tokio::io::stdin()));
    let mut tasks = controller.start(first_event, input).await?;

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = shutdown => tracing::info!("Shutdown requested"),
        Some(result) = tasks.join_next() => log_task_exit(result),
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        log_task_exit(result);
    }

    Ok(())
}
