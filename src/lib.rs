pub mod error;
pub mod hud;
pub mod inference;
pub mod models;
pub mod narration;
pub mod overlay;
pub mod projection;
pub mod session;
pub mod settings;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use inference::ReplayCollaborator;
use narration::{LogSpeechSink, NarrationChannel, NarrationController};
use session::{commands::HELP, execute, parse_command, OperatorCommand, WorkbenchController};
use settings::SettingsStore;

pub use error::WorkbenchError;

const DEFAULT_FIXTURES: &str = "demos";

fn init_logging() {
    let debug_mode = std::env::var("CIRCUITSENSE_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let default_level = if debug_mode { "debug" } else { "info" };

    // RUST_LOG still wins when set.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .try_init();
}

fn fixtures_dir() -> PathBuf {
    std::env::var_os("CIRCUITSENSE_FIXTURES")
        .map(PathBuf::from)
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURES))
}

/// Offline operator console: recorded model responses stand in for the
/// remote vision model, narration goes to the log.
pub async fn run() -> Result<()> {
    init_logging();

    log::info!("CircuitSense starting up...");

    let settings = Arc::new(SettingsStore::new(SettingsStore::default_path())?);
    log::info!("operator settings at {}", settings.path().display());

    let collaborator = ReplayCollaborator::new(fixtures_dir());
    log::info!("replaying model responses from {}", collaborator.dir().display());

    let narration = NarrationChannel::new();
    let mut speaker = NarrationController::new();
    speaker.start(&narration, Arc::new(LogSpeechSink))?;

    let controller =
        WorkbenchController::with_settings(Arc::new(collaborator), narration, settings);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout.write_all(format!("{HELP}\n> ").as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await.context("reading operator input")? {
        let reply = match parse_command(&line) {
            Ok(OperatorCommand::Quit) => break,
            Ok(command) => execute(&controller, command).await,
            Err(err) => Err(err),
        };
        let text = match reply {
            Ok(text) => text,
            Err(err) => format!("error: {err}"),
        };
        stdout.write_all(format!("{text}\n> ").as_bytes()).await?;
        stdout.flush().await?;
    }

    speaker.stop().await?;
    log::info!("CircuitSense shutting down");
    Ok(())
}
