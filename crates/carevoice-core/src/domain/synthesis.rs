//! Synthesis engine events.

use super::speech::UtteranceId;

/// Lifecycle event for one utterance, reported by the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisEvent {
    pub id: UtteranceId,
    pub kind: SynthesisEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEventKind {
    /// Playback began.
    Started,
    /// Playback finished normally.
    Ended,
    /// Playback failed; the message comes from the engine.
    Failed(String),
}

impl SynthesisEvent {
    pub const fn started(id: UtteranceId) -> Self {
        Self {
            id,
            kind: SynthesisEventKind::Started,
        }
    }

    pub const fn ended(id: UtteranceId) -> Self {
        Self {
            id,
            kind: SynthesisEventKind::Ended,
        }
    }

    pub fn failed(id: UtteranceId, message: impl Into<String>) -> Self {
        Self {
            id,
            kind: SynthesisEventKind::Failed(message.into()),
        }
    }
}
