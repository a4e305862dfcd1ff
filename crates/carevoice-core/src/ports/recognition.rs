//! Speech recognition engine port.

use crate::error::EngineError;

/// Engine configuration applied once when the recognizer is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// Keep listening across utterances.
    pub continuous: bool,
    /// Report partial transcripts while the user is still speaking.
    pub interim_results: bool,
    /// BCP 47 language tag, e.g. `"en-US"`.
    pub locale: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: false,
            locale: crate::settings::DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Platform speech-to-text engine.
///
/// Implementations deliver [`RecognitionEvent`](crate::domain::RecognitionEvent)s
/// (`Started`, `Result`, `Error`, `Ended`) back to the recognizer that owns
/// them. Every capture cycle ends with exactly one `Ended` event, whether it
/// was stopped, aborted or failed.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait RecognitionEngine: Send {
    /// Whether the platform offers speech recognition at all.
    fn is_available(&self) -> bool;

    /// Apply engine configuration. Called before the first `start`.
    fn configure(&mut self, config: &RecognitionConfig);

    /// Begin capturing audio.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Stop capturing; pending audio is still transcribed.
    fn stop(&mut self);

    /// Stop capturing and discard pending audio.
    fn abort(&mut self);
}
