use log::info;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{SpeechSink, Utterance};

pub async fn narration_loop(
    mut rx: watch::Receiver<Option<Utterance>>,
    sink: Arc<dyn SpeechSink>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    info!("narration channel closed");
                    break;
                }
                let latest = rx.borrow_and_update().clone();
                if let Some(utterance) = latest {
                    sink.speak(&utterance);
                }
            }
            _ = cancel_token.cancelled() => {
                info!("narration loop shutting down");
                break;
            }
        }
    }
}
