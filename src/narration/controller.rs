use anyhow::{bail, Context, Result};
use log::info;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::narration_loop;
use super::{NarrationChannel, SpeechSink};

/// Owns the task that forwards narration requests to a speech sink.
pub struct NarrationController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl NarrationController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, channel: &NarrationChannel, sink: Arc<dyn SpeechSink>) -> Result<()> {
        if self.handle.is_some() {
            bail!("narration already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(narration_loop(
            channel.subscribe(),
            sink,
            cancel_token.clone(),
        ));
        info!("narration started");

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("narration loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for NarrationController {
    fn default() -> Self {
        Self::new()
    }
}
