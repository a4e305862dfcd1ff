//! Voice navigation error types.

use carevoice_core::{EngineError, SettingsError};

/// Errors returned by voice components.
///
/// Only construction and explicit engine commands return these. Runtime
/// failures during a session are reported as
/// [`VoiceEvent::Error`](crate::VoiceEvent::Error) strings instead.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The platform has no speech synthesis engine.
    #[error("Speech synthesis is not supported on this device")]
    SynthesisUnsupported,

    /// The platform has no speech recognition engine.
    #[error("Voice navigation is not supported on this device")]
    RecognitionUnsupported,

    /// An engine refused a command.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Settings failed validation.
    #[error("Invalid voice settings: {0}")]
    Settings(#[from] SettingsError),
}

/// A transcript that no registered command matched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Command not recognized: '{0}'. Please try again.")]
    NotRecognized(String),
}
