use intongues_types::{AppEvent, OutputLine, ReviewQuality, VocabStatus};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

const HELP: &str = "r reveal | 1-4 again/hard/good/easy | s <status> correct | n skip | q quit";

/// Turn one line of review input into an event, `Ok(None)` for blank lines
pub fn parse_command(line: &str) -> Result<Option<AppEvent>, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let event = match command {
        "" => return Ok(None),
        "r" | "reveal" => AppEvent::Reveal,
        "n" | "skip" => AppEvent::Skip,
        "q" | "quit" => AppEvent::Shutdown,
        "s" | "status" => {
            let status = rest.parse::<VocabStatus>().map_err(|e| e.to_string())?;
            AppEvent::CorrectStatus(status)
        }
        other => match other.parse::<ReviewQuality>() {
            Ok(quality) => AppEvent::Answer(quality),
            Err(_) => return Err(format!("Unrecognised command '{line}' ({HELP})")),
        },
    };

    Ok(Some(event))
}

pub fn format_line(line: &OutputLine) -> String {
    match line {
        OutputLine::Info(text) => text.clone(),
        OutputLine::Card {
            front,
            remaining,
            play_audio,
        } => format!("[{remaining} left] {front}{}", audio_marker(*play_audio)),
        OutputLine::Answer { back, play_audio } => {
            format!("  = {back}{}", audio_marker(*play_audio))
        }
        OutputLine::Error(message) => format!("error: {message}"),
    }
}

fn audio_marker(play_audio: bool) -> &'static str {
    if play_audio { " (audio)" } else { "" }
}

/// Reads review commands until `q`, EOF or cancellation
pub async fn input_loop<R>(
    reader: R,
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    println!("{HELP}");

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Input loop stopping");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::debug!("stdin closed");
            event_tx.send(AppEvent::Shutdown).await?;
            return Ok(());
        };

        match parse_command(&line) {
            Ok(Some(AppEvent::Shutdown)) => {
                event_tx.send(AppEvent::Shutdown).await?;
                return Ok(());
            }
            Ok(Some(event)) => event_tx.send(event).await?,
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }
}

/// Prints `ShowOutput` events, draining what is queued before stopping
pub async fn output_loop(
    app_to_cli_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            biased;
            event = app_to_cli_rx.recv() => match event? {
                AppEvent::ShowOutput(line) => print_line(&line),
                other => tracing::warn!("Unexpected event for output: {other:?}"),
            },
            _ = cancel.cancelled() => {
                while let Ok(Some(event)) = app_to_cli_rx.try_recv() {
                    if let AppEvent::ShowOutput(line) = event {
                        print_line(&line);
                    }
                }
                return Ok(());
            }
        }
    }
}

fn print_line(line: &OutputLine) {
    match line {
        OutputLine::Error(_) => eprintln!("{}", format_line(line)),
        _ => println!("{}", format_line(line)),
    }
}
