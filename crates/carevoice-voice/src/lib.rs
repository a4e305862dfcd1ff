#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests.
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;

pub mod driver;
pub mod error;
pub mod events;
pub mod recognizer;
pub mod registry;
pub mod session;
pub mod synthesizer;

// Re-export key types for convenience
pub use driver::{SessionCommand, SessionInput, run_session};
pub use error::{DispatchError, VoiceError};
pub use events::{EventSink, SessionState, VoiceEvent, drain_events};
pub use recognizer::{RESTARTS_EXHAUSTED_MESSAGE, RecognizerOutput, SpeechRecognizer};
pub use registry::{CommandRegistry, NO_COMMANDS_HELP};
pub use session::{LISTENING_OFF_CONFIRMATION, LISTENING_ON_CONFIRMATION, VoiceSession};
pub use synthesizer::{SpeechSynthesizer, SynthesizerConfig, UtteranceCallbacks};
