//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the voice session is wired together
//! for the CLI adapter: settings are resolved, console engines are created
//! and both engines are pointed at the session's input channel.

use std::path::PathBuf;

use carevoice_core::{VoiceSettings, validate_settings};
use carevoice_voice::{SessionInput, VoiceEvent, VoiceSession};
use tokio::sync::mpsc;

use crate::console::{ConsoleRecognition, ConsoleSynthesis};
use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// JSON settings file; defaults apply when absent.
    pub settings_path: Option<PathBuf>,
    /// Locale override applied on top of the settings file.
    pub locale: Option<String>,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            settings_path: cli.settings.clone(),
            locale: cli.locale.clone(),
        }
    }

    /// Resolve voice settings: file (or defaults), then overrides, then validation.
    pub fn load_settings(&self) -> Result<VoiceSettings, CliError> {
        let mut settings = match &self.settings_path {
            Some(path) => VoiceSettings::load(path)?,
            None => VoiceSettings::default(),
        };
        if let Some(locale) = &self.locale {
            settings.locale.clone_from(locale);
        }
        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Fully composed voice session for CLI commands.
pub struct CliContext {
    pub session: VoiceSession,
    /// Events the session emits for display.
    pub events: mpsc::UnboundedReceiver<VoiceEvent>,
    /// Sender for engine events and session commands.
    pub inputs: mpsc::UnboundedSender<SessionInput>,
    /// Receiver handed to the session driver.
    pub input_rx: mpsc::UnboundedReceiver<SessionInput>,
}

/// Build a session over console engines.
pub fn bootstrap(settings: VoiceSettings) -> Result<CliContext, CliError> {
    let (inputs, input_rx) = mpsc::unbounded_channel();
    let recognition = ConsoleRecognition::new(inputs.clone());
    let synthesis = ConsoleSynthesis::new(inputs.clone());

    let (session, events) = VoiceSession::new(Box::new(recognition), Box::new(synthesis), settings)?;
    tracing::debug!(?session, "CLI voice session ready");

    Ok(CliContext {
        session,
        events,
        inputs,
        input_rx,
    })
}
