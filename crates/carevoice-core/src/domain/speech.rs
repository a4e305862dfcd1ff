//! Speech synthesis types: utterances, prosody presets and voices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Prosody ────────────────────────────────────────────────────────

/// Rate, pitch and volume applied to one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prosody {
    /// Speaking rate multiplier (1.0 = engine default).
    pub rate: f32,
    /// Pitch multiplier (1.0 = engine default).
    pub pitch: f32,
    /// Volume in the range 0.0–1.0.
    pub volume: f32,
}

impl Prosody {
    /// Engine defaults.
    pub const NORMAL: Self = Self::new(1.0, 1.0, 1.0);

    /// Urgent alerts.
    pub const CRITICAL: Self = Self::new(1.0, 1.2, 1.0);
    /// High-priority notifications.
    pub const HIGH: Self = Self::new(0.95, 1.1, 1.0);
    /// Routine notifications.
    pub const MEDIUM: Self = Self::new(0.9, 1.0, 0.9);
    /// Background information.
    pub const LOW: Self = Self::new(0.85, 0.9, 0.8);

    pub const fn new(rate: f32, pitch: f32, volume: f32) -> Self {
        Self {
            rate,
            pitch,
            volume,
        }
    }
}

impl Default for Prosody {
    fn default() -> Self {
        Self::NORMAL
    }
}

// ── Notification priority ──────────────────────────────────────────

/// Urgency of a spoken notification; selects the prosody preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl NotificationPriority {
    pub const fn prosody(self) -> Prosody {
        match self {
            Self::Critical => Prosody::CRITICAL,
            Self::High => Prosody::HIGH,
            Self::Medium => Prosody::MEDIUM,
            Self::Low => Prosody::LOW,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown priority '{other}' (expected critical, high, medium or low)"
            )),
        }
    }
}

// ── Speak options ──────────────────────────────────────────────────

/// Per-call overrides. Unset fields fall back to the synthesizer defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakOptions {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub locale: Option<String>,
}

impl SpeakOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }

    #[must_use]
    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    #[must_use]
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Fill unset fields from `defaults`.
    pub fn resolve(&self, defaults: Prosody) -> Prosody {
        Prosody {
            rate: self.rate.unwrap_or(defaults.rate),
            pitch: self.pitch.unwrap_or(defaults.pitch),
            volume: self.volume.unwrap_or(defaults.volume),
        }
    }
}

impl From<Prosody> for SpeakOptions {
    fn from(prosody: Prosody) -> Self {
        Self {
            rate: Some(prosody.rate),
            pitch: Some(prosody.pitch),
            volume: Some(prosody.volume),
            locale: None,
        }
    }
}

// ── Utterance ──────────────────────────────────────────────────────

/// Identifier assigned to each utterance by the synthesizer.
///
/// Engines echo it back in [`SynthesisEvent`](super::SynthesisEvent)s so that
/// events for cancelled utterances can be told apart from the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

/// One unit of synthesized speech, as handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub prosody: Prosody,
    /// BCP 47 language tag, e.g. `"en-US"`.
    pub locale: String,
    /// Name of the engine voice to use, when one matches the locale.
    pub voice: Option<String>,
}

// ── Voices ─────────────────────────────────────────────────────────

/// A voice offered by the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    pub name: String,
    /// BCP 47 language tag, e.g. `"en-GB"`.
    pub locale: String,
    /// Whether the engine uses this voice when none is selected.
    pub is_default: bool,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
            is_default: false,
        }
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Language subtag of a locale tag: `"en"` for `"en-US"` or `"en_GB"`.
pub fn language_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}
