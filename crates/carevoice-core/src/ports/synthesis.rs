//! Speech synthesis engine port.

use crate::domain::{Utterance, VoiceDescriptor};
use crate::error::EngineError;

/// Platform text-to-speech engine.
///
/// The engine plays one utterance at a time; queueing is the synthesizer's
/// job. For every utterance accepted by [`speak`](Self::speak) the engine
/// reports [`SynthesisEvent`](crate::domain::SynthesisEvent)s tagged with
/// [`Utterance::id`]: `Started`, then either `Ended` or `Failed`.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait SynthesisEngine: Send {
    /// Whether the platform offers speech synthesis at all.
    fn is_available(&self) -> bool;

    /// Start speaking an utterance.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), EngineError>;

    /// Stop playback immediately.
    fn cancel(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Resume paused playback.
    fn resume(&mut self);

    /// Voices currently offered by the engine.
    fn voices(&self) -> Vec<VoiceDescriptor>;
}
