//! One-way narration side channel. The session decides what to say; playback
//! belongs to an external speech engine.

pub mod controller;
pub mod loop_worker;

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

pub use controller::NarrationController;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    pub requested_at: DateTime<Utc>,
}

/// External text-to-speech engine. A new utterance must cut off whatever is
/// still playing.
pub trait SpeechSink: Send + Sync + 'static {
    fn speak(&self, utterance: &Utterance);
}

/// Stand-in sink that writes utterances to the log.
pub struct LogSpeechSink;

impl SpeechSink for LogSpeechSink {
    fn speak(&self, utterance: &Utterance) {
        log::info!("narrate: {}", utterance.text);
    }
}

/// Holds only the latest request: a slow consumer skips stale utterances
/// instead of queueing them.
#[derive(Clone)]
pub struct NarrationChannel {
    tx: Arc<watch::Sender<Option<Utterance>>>,
}

impl NarrationChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn request(&self, text: impl Into<String>) -> Utterance {
        let utterance = Utterance {
            id: Uuid::new_v4(),
            text: text.into(),
            requested_at: Utc::now(),
        };
        debug!("narration requested: {}", utterance.text);
        self.tx.send_replace(Some(utterance.clone()));
        utterance
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Utterance>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Option<Utterance> {
        self.tx.borrow().clone()
    }
}

impl Default for NarrationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newest_request_wins() {
        let channel = NarrationChannel::new();
        let mut rx = channel.subscribe();
        channel.request("first");
        let second = channel.request("second");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().clone(), Some(second));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn request_without_listeners_is_kept() {
        let channel = NarrationChannel::new();
        channel.request("nobody listening");
        assert_eq!(
            channel.latest().map(|utterance| utterance.text),
            Some("nobody listening".to_string())
        );
    }
}
