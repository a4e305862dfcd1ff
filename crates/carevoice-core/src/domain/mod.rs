//! Domain types for voice navigation.
//!
//! These are pure data types with no engine or runtime dependencies.

mod command;
mod recognition;
mod speech;
mod synthesis;

pub use command::{CommandAction, VoiceCommand, normalize_phrase};
pub use recognition::{RecognitionErrorCode, RecognitionEvent, RecognitionResult};
pub use speech::{
    NotificationPriority, Prosody, SpeakOptions, Utterance, UtteranceId, VoiceDescriptor,
    language_subtag,
};
pub use synthesis::{SynthesisEvent, SynthesisEventKind};
