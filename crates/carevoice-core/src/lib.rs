#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CommandAction, NotificationPriority, Prosody, RecognitionErrorCode, RecognitionEvent,
    RecognitionResult, SpeakOptions, SynthesisEvent, SynthesisEventKind, Utterance, UtteranceId,
    VoiceCommand, VoiceDescriptor, language_subtag, normalize_phrase,
};
pub use error::EngineError;
pub use ports::{RecognitionConfig, RecognitionEngine, SynthesisEngine};
pub use settings::{
    DEFAULT_CONFIRMATION_RATE, DEFAULT_LOCALE, RestartPolicy, SettingsError, VoiceSettings,
    validate_settings,
};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::{MockRecognitionEngine, MockSynthesisEngine};
