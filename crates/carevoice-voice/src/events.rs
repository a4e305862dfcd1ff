//! Events emitted to the UI layer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by a voice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The recognizer started or stopped capturing.
    ListeningChanged(bool),

    /// Speech output started, or the queue drained.
    SpeakingChanged(bool),

    /// A transcript was produced.
    Transcript {
        /// Normalised (final) or raw (interim) text.
        text: String,
        /// Whether this is a partial (streaming) or final result.
        is_final: bool,
    },

    /// A command matched; carries the command's primary phrase.
    CommandRecognized(String),

    /// A user-facing error message.
    Error(String),
}

/// Listening/speaking flags exposed to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_listening: bool,
    pub is_speaking: bool,
}

/// Sending half of a session's event channel, shared by its components.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<VoiceEvent>,
}

impl EventSink {
    pub const fn new(tx: mpsc::UnboundedSender<VoiceEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<VoiceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Emit an event (best-effort; a dropped receiver is only logged).
    pub fn emit(&self, event: VoiceEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Voice event receiver dropped");
        }
    }
}

/// Drain every event currently buffered in `rx`.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<VoiceEvent>) -> Vec<VoiceEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_after_receiver_dropped_is_silent() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(VoiceEvent::ListeningChanged(true));
    }

    #[test]
    fn drain_returns_events_in_order() {
        let (sink, mut rx) = EventSink::channel();
        sink.emit(VoiceEvent::ListeningChanged(true));
        sink.emit(VoiceEvent::CommandRecognized("go home".into()));

        assert_eq!(
            drain_events(&mut rx),
            vec![
                VoiceEvent::ListeningChanged(true),
                VoiceEvent::CommandRecognized("go home".into()),
            ]
        );
        assert!(drain_events(&mut rx).is_empty());
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(
            SessionState::default(),
            SessionState {
                is_listening: false,
                is_speaking: false,
            }
        );
    }
}
