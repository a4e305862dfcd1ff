//! Integration tests for the public voice domain API.
//!
//! Exercises the types UI layers build on: commands, speak options,
//! settings files and the restart policy.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use carevoice_core::{
    NotificationPriority, Prosody, RecognitionErrorCode, RestartPolicy, SettingsError,
    SpeakOptions, VoiceCommand, VoiceSettings, language_subtag, normalize_phrase,
};

#[test]
fn test_command_keys_cover_phrase_and_aliases() {
    let command = VoiceCommand::new("Go Home", "open the home screen", || {})
        .alias("Dashboard")
        .aliases(["home", "  Main Screen "]);

    assert_eq!(
        command.keys(),
        vec!["go home", "dashboard", "home", "main screen"]
    );
}

#[test]
fn test_cloned_command_shares_action() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let command = VoiceCommand::new("medications", "", move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let copy = command.clone();
    command.run();
    copy.run();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_normalize_phrase() {
    assert_eq!(normalize_phrase("  Show HEALTH "), "show health");
    assert_eq!(normalize_phrase("   "), "");
}

#[test]
fn test_priority_parsing() {
    assert_eq!(
        "Critical".parse::<NotificationPriority>(),
        Ok(NotificationPriority::Critical)
    );
    assert_eq!(
        " low ".parse::<NotificationPriority>(),
        Ok(NotificationPriority::Low)
    );
    assert!("urgent".parse::<NotificationPriority>().is_err());
}

#[test]
fn test_speak_options_override_only_set_fields() {
    let options = SpeakOptions::new().rate(0.8);
    assert_eq!(options.resolve(Prosody::NORMAL), Prosody::new(0.8, 1.0, 1.0));

    let preset = SpeakOptions::from(NotificationPriority::Low.prosody());
    assert_eq!(preset.resolve(Prosody::NORMAL), Prosody::LOW);
}

#[test]
fn test_language_subtag() {
    assert_eq!(language_subtag("en-GB"), "en");
    assert_eq!(language_subtag("pt_BR"), "pt");
    assert_eq!(language_subtag("fr"), "fr");
}

#[test]
fn test_platform_error_codes() {
    assert_eq!(
        RecognitionErrorCode::from_platform("no-speech"),
        RecognitionErrorCode::NoSpeech
    );
    assert!(RecognitionErrorCode::NoSpeech.is_transient());
    assert!(!RecognitionErrorCode::NotAllowed.is_transient());

    let unknown = RecognitionErrorCode::from_platform("service-not-allowed-here");
    assert_eq!(unknown.as_str(), "service-not-allowed-here");
}

#[test]
fn test_partial_settings_file_takes_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"locale": "en-GB", "announceCommands": false}}"#).unwrap();

    let settings = VoiceSettings::load(file.path()).unwrap();

    assert_eq!(settings.locale, "en-GB");
    assert!(!settings.announce_commands);
    assert!(settings.continuous);
    assert_eq!(settings.restart, RestartPolicy::default());
}

#[test]
fn test_invalid_settings_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"confirmationRate": 42.0}}"#).unwrap();

    let err = VoiceSettings::load(file.path()).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidRate(_)));
}

#[test]
fn test_exponential_policy_doubles_until_cap() {
    let policy = RestartPolicy::exponential(
        Some(3),
        Duration::from_millis(100),
        Duration::from_millis(250),
    );

    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(250));
    assert!(policy.allows(3));
    assert!(!policy.allows(4));
}

#[test]
fn test_unbounded_policy_never_gives_up() {
    let policy = RestartPolicy::unbounded();
    assert!(policy.allows(u32::MAX));
    assert_eq!(policy.delay_for(50), Duration::ZERO);
}
