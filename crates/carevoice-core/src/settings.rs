//! Voice settings domain types and validation.
//!
//! These are pure domain types; the only I/O is [`VoiceSettings::load`],
//! which reads a JSON settings file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Prosody;

/// Locale used when settings do not name one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Speaking rate for short spoken confirmations ("Voice navigation activated").
pub const DEFAULT_CONFIRMATION_RATE: f32 = 1.2;

/// Ceiling on consecutive automatic restarts of the recognizer.
pub const DEFAULT_MAX_RESTART_ATTEMPTS: u32 = 10;

/// Upper bound for the exponential restart backoff.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

// ── Restart policy ─────────────────────────────────────────────────

/// How a continuous recognizer restarts after the engine ends a capture cycle.
///
/// Attempts count consecutive capture cycles that ended in an error other
/// than `no-speech`. A clean cycle or a final transcript resets the count, so
/// the ceiling only bounds loops such as a denied microphone failing on every
/// start. Clean cycles always restart immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestartPolicy {
    /// Maximum consecutive restarts after failed cycles. `None` restarts forever.
    pub max_attempts: Option<u32>,

    /// Delay before the first restart. Zero restarts immediately.
    pub initial_backoff_ms: u64,

    /// Cap for the doubling delay.
    pub max_backoff_ms: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(DEFAULT_MAX_RESTART_ATTEMPTS),
            initial_backoff_ms: 0,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

impl RestartPolicy {
    /// Restart immediately and without limit.
    pub const fn unbounded() -> Self {
        Self {
            max_attempts: None,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Exponential backoff starting at `initial`, capped at `max`.
    pub fn exponential(max_attempts: Option<u32>, initial: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: u64::try_from(initial.as_millis()).unwrap_or(u64::MAX),
            max_backoff_ms: u64::try_from(max.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether restart number `attempt` (1-based) is allowed.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt <= max)
    }

    /// Delay before restart number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.initial_backoff_ms == 0 {
            return Duration::ZERO;
        }
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms.max(self.initial_backoff_ms));
        Duration::from_millis(millis)
    }
}

// ── Settings ───────────────────────────────────────────────────────

/// User-facing voice navigation settings.
///
/// Missing fields in a settings file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceSettings {
    /// BCP 47 language tag for recognition and synthesis.
    pub locale: String,

    /// Keep listening after each recognized phrase.
    pub continuous: bool,

    /// Surface partial transcripts while the user is speaking.
    pub interim_results: bool,

    /// Restart policy for continuous listening.
    pub restart: RestartPolicy,

    /// Prosody for utterances that do not override it.
    pub default_prosody: Prosody,

    /// Rate for spoken confirmations.
    pub confirmation_rate: f32,

    /// Speak "Voice navigation activated/deactivated" on toggles.
    pub announce_listening: bool,

    /// Speak "<command> activated" after each recognized command.
    pub announce_commands: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            continuous: true,
            interim_results: false,
            restart: RestartPolicy::default(),
            default_prosody: Prosody::NORMAL,
            confirmation_rate: DEFAULT_CONFIRMATION_RATE,
            announce_listening: true,
            announce_commands: true,
        }
    }
}

impl VoiceSettings {
    /// Read settings from a JSON file and validate them.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw)?;
        validate_settings(&settings)?;
        tracing::debug!(path = %path.display(), locale = %settings.locale, "Loaded voice settings");
        Ok(settings)
    }
}

/// Settings loading or validation error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Locale cannot be empty")]
    EmptyLocale,

    #[error("Speaking rate must be between 0.1 and 10.0, got {0}")]
    InvalidRate(f32),

    #[error("Pitch must be between 0.0 and 2.0, got {0}")]
    InvalidPitch(f32),

    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),

    #[error("Initial restart backoff ({initial_ms} ms) exceeds the maximum ({max_ms} ms)")]
    InvalidBackoff { initial_ms: u64, max_ms: u64 },
}

/// Validate settings values against the ranges speech engines accept.
pub fn validate_settings(settings: &VoiceSettings) -> Result<(), SettingsError> {
    if settings.locale.trim().is_empty() {
        return Err(SettingsError::EmptyLocale);
    }

    validate_prosody(&settings.default_prosody)?;

    if !(0.1..=10.0).contains(&settings.confirmation_rate) {
        return Err(SettingsError::InvalidRate(settings.confirmation_rate));
    }

    let restart = &settings.restart;
    if restart.initial_backoff_ms > 0 && restart.initial_backoff_ms > restart.max_backoff_ms {
        return Err(SettingsError::InvalidBackoff {
            initial_ms: restart.initial_backoff_ms,
            max_ms: restart.max_backoff_ms,
        });
    }

    Ok(())
}

fn validate_prosody(prosody: &Prosody) -> Result<(), SettingsError> {
    if !(0.1..=10.0).contains(&prosody.rate) {
        return Err(SettingsError::InvalidRate(prosody.rate));
    }
    if !(0.0..=2.0).contains(&prosody.pitch) {
        return Err(SettingsError::InvalidPitch(prosody.pitch));
    }
    if !(0.0..=1.0).contains(&prosody.volume) {
        return Err(SettingsError::InvalidVolume(prosody.volume));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.locale, "en-US");
        assert!(settings.continuous);
        assert!(settings.announce_commands);
        assert_eq!(settings.restart.max_attempts, Some(10));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_empty_locale() {
        let settings = VoiceSettings {
            locale: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyLocale)
        ));
    }

    #[test]
    fn test_validate_volume_out_of_range() {
        let settings = VoiceSettings {
            default_prosody: Prosody::new(1.0, 1.0, 1.5),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidVolume(_))
        ));
    }

    #[test]
    fn test_validate_confirmation_rate() {
        let settings = VoiceSettings {
            confirmation_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_validate_backoff_bounds() {
        let settings = VoiceSettings {
            restart: RestartPolicy {
                max_attempts: Some(3),
                initial_backoff_ms: 5_000,
                max_backoff_ms: 1_000,
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidBackoff { .. })
        ));
    }

    #[test]
    fn test_restart_policy_ceiling() {
        let policy = RestartPolicy::default();
        assert!(policy.allows(1));
        assert!(policy.allows(10));
        assert!(!policy.allows(11));

        assert!(RestartPolicy::unbounded().allows(u32::MAX));
    }

    #[test]
    fn test_restart_policy_backoff_doubles_and_caps() {
        let policy = RestartPolicy::exponential(
            Some(10),
            Duration::from_millis(250),
            Duration::from_secs(1),
        );
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_secs(1));
        assert_eq!(policy.delay_for(64), Duration::from_secs(1));
        assert_eq!(RestartPolicy::default().delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "locale": "en-GB", "restart": {{ "maxAttempts": 3 }} }}"#
        )
        .unwrap();

        let settings = VoiceSettings::load(file.path()).unwrap();
        assert_eq!(settings.locale, "en-GB");
        assert_eq!(settings.restart.max_attempts, Some(3));
        assert_eq!(settings.restart.max_backoff_ms, DEFAULT_MAX_BACKOFF_MS);
        assert!(settings.announce_listening);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "defaultProsody": {{ "rate": 20.0, "pitch": 1.0, "volume": 1.0 }} }}"#)
            .unwrap();

        assert!(matches!(
            VoiceSettings::load(file.path()),
            Err(SettingsError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = VoiceSettings::load(Path::new("/nonexistent/carevoice.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
