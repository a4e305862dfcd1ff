//! Errors reported by speech engine ports.

use thiserror::Error;

/// Failure returned by a [`RecognitionEngine`](crate::ports::RecognitionEngine)
/// or [`SynthesisEngine`](crate::ports::SynthesisEngine) command.
///
/// Engines report asynchronous failures through events
/// ([`RecognitionEvent::Error`](crate::domain::RecognitionEvent::Error),
/// [`SynthesisEventKind::Failed`](crate::domain::SynthesisEventKind::Failed)).
/// This type only covers commands the engine refuses synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The platform offers no engine of this kind.
    #[error("Speech engine is not available on this device")]
    Unavailable,

    /// The engine is already running and cannot be started again.
    #[error("Speech engine is already running")]
    AlreadyStarted,

    /// The engine rejected the command.
    #[error("Speech engine failed: {0}")]
    Failed(String),
}
