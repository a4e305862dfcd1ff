//! CLI-specific error types and mappings.
//!
//! Maps voice and settings errors to exit codes and user-facing messages.

use carevoice_core::SettingsError;
use carevoice_voice::VoiceError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument error not caught by the parser.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (stdin closed, stdout broken, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file missing, malformed or out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A speech engine could not be used.
    #[error("{0}")]
    Voice(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Voice(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Settings(settings_err) => Self::Config(settings_err.to_string()),
            other => Self::Voice(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Voice("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_voice_settings_error_maps_to_config() {
        let err = CliError::from(VoiceError::Settings(SettingsError::EmptyLocale));
        assert!(matches!(err, CliError::Config(_)));

        let err = CliError::from(VoiceError::SynthesisUnsupported);
        assert_eq!(err.to_string(), "Speech synthesis is not supported on this device");
    }
}
