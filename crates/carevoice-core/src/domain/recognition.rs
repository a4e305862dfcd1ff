//! Speech recognition payloads, decoded once at the engine boundary.

use serde::{Deserialize, Serialize};

/// One recognition result. Only the engine's top alternative is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Recognized text as reported by the engine (not normalised).
    pub transcript: String,

    /// Whether the engine considers this result final.
    pub is_final: bool,

    /// Engine confidence in the range 0.0–1.0.
    pub confidence_score: f32,
}

impl RecognitionResult {
    /// A final result with full confidence.
    pub fn final_text(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
            confidence_score: 1.0,
        }
    }

    /// An interim (partial) result.
    pub fn interim(transcript: impl Into<String>, confidence_score: f32) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
            confidence_score,
        }
    }
}

/// Recognition error codes surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorCode {
    /// No speech was heard before the engine timed out.
    NoSpeech,
    /// The microphone could not be opened.
    AudioCapture,
    /// Microphone permission was denied.
    NotAllowed,
    /// The engine's network service failed.
    Network,
    /// Any code without a dedicated message.
    Other(String),
}

impl RecognitionErrorCode {
    /// Decode a platform error code such as `"no-speech"`.
    pub fn from_platform(code: &str) -> Self {
        match code.trim() {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }

    /// Platform code string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::AudioCapture => "audio-capture",
            Self::NotAllowed => "not-allowed",
            Self::Network => "network",
            Self::Other(code) => code,
        }
    }

    /// Fixed sentence shown and spoken to the user.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NoSpeech => "No speech was detected. Please try again.",
            Self::AudioCapture => "Microphone is not available. Please check your microphone.",
            Self::NotAllowed => "Microphone permission denied. Please allow microphone access.",
            Self::Network => "Network error occurred. Please check your connection.",
            Self::Other(_) => "A voice navigation error occurred. Please try again.",
        }
    }

    /// Whether the error usually clears up by itself (retrying helps).
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NoSpeech | Self::Network)
    }
}

/// Lifecycle and result events from a recognition engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Audio capture began.
    Started,
    /// A transcript is available.
    Result(RecognitionResult),
    /// The engine reported an error. An `Ended` event normally follows.
    Error(RecognitionErrorCode),
    /// The engine stopped capturing.
    Ended,
}
