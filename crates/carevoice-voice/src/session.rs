//! Voice session. Binds the recognizer, command registry and synthesizer
//! into one API for a UI layer, with spoken feedback on state changes.
//!
//! The session owns every component and is driven by calling its `handle_*`
//! methods with engine events, either directly or through
//! [`run_session`](crate::run_session). Runtime failures never surface as
//! `Err`: they are emitted as [`VoiceEvent::Error`] and spoken aloud.

use std::time::Duration;

use carevoice_core::{
    NotificationPriority, RecognitionConfig, RecognitionEngine, RecognitionEvent, SpeakOptions,
    SynthesisEngine, SynthesisEvent, UtteranceId, VoiceCommand, VoiceDescriptor, VoiceSettings,
    validate_settings,
};
use tokio::sync::mpsc;

use crate::error::VoiceError;
use crate::events::{EventSink, SessionState, VoiceEvent};
use crate::recognizer::{RecognizerOutput, SpeechRecognizer};
use crate::registry::CommandRegistry;
use crate::synthesizer::{SpeechSynthesizer, SynthesizerConfig, UtteranceCallbacks};

/// Spoken when listening starts.
pub const LISTENING_ON_CONFIRMATION: &str = "Voice navigation activated";

/// Spoken when listening is stopped by the user.
pub const LISTENING_OFF_CONFIRMATION: &str = "Voice navigation deactivated";

pub struct VoiceSession {
    recognizer: SpeechRecognizer,
    registry: CommandRegistry,
    synthesizer: SpeechSynthesizer,
    settings: VoiceSettings,
    events: EventSink,
    closed: bool,
}

impl VoiceSession {
    /// Create a session over the given engines.
    ///
    /// Returns the session together with the receiver for its events. Fails
    /// when the settings are invalid or the platform cannot synthesize
    /// speech. A missing recognizer only fails once listening is requested.
    pub fn new(
        recognition: Box<dyn RecognitionEngine>,
        synthesis: Box<dyn SynthesisEngine>,
        settings: VoiceSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<VoiceEvent>), VoiceError> {
        validate_settings(&settings)?;

        let (events, rx) = EventSink::channel();
        let synthesizer = SpeechSynthesizer::new(
            synthesis,
            SynthesizerConfig::from(&settings),
            events.clone(),
        )?;
        let config = RecognitionConfig {
            continuous: settings.continuous,
            interim_results: settings.interim_results,
            locale: settings.locale.clone(),
        };
        let recognizer =
            SpeechRecognizer::new(recognition, config, settings.restart.clone(), events.clone());

        tracing::info!(locale = %settings.locale, continuous = settings.continuous, "Voice session created");

        Ok((
            Self {
                recognizer,
                registry: CommandRegistry::new(),
                synthesizer,
                settings,
                events,
                closed: false,
            },
            rx,
        ))
    }

    pub const fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub const fn state(&self) -> SessionState {
        SessionState {
            is_listening: self.recognizer.is_listening(),
            is_speaking: self.synthesizer.is_speaking(),
        }
    }

    pub const fn is_listening(&self) -> bool {
        self.recognizer.is_listening()
    }

    pub const fn is_speaking(&self) -> bool {
        self.synthesizer.is_speaking()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub const fn recognizer(&self) -> &SpeechRecognizer {
        &self.recognizer
    }

    pub const fn synthesizer(&self) -> &SpeechSynthesizer {
        &self.synthesizer
    }

    // ── Listening ──────────────────────────────────────────────────

    /// Start listening and confirm it aloud.
    ///
    /// Also withdraws a stop that the engine has not finished yet.
    pub fn start_listening(&mut self) {
        if self.closed || self.is_capture_requested() {
            return;
        }
        match self.recognizer.start() {
            Ok(()) => {
                if self.settings.announce_listening {
                    self.confirm(LISTENING_ON_CONFIRMATION);
                }
            }
            Err(e) => self.report_error(&e.to_string()),
        }
    }

    /// Stop listening and confirm it aloud.
    pub fn stop_listening(&mut self) {
        if self.closed || !self.is_capture_requested() {
            return;
        }
        self.recognizer.stop();
        if self.settings.announce_listening {
            self.confirm(LISTENING_OFF_CONFIRMATION);
        }
    }

    pub fn toggle_listening(&mut self) {
        if self.is_capture_requested() {
            self.stop_listening();
        } else {
            self.start_listening();
        }
    }

    // ── Commands ───────────────────────────────────────────────────

    pub fn register_command(&mut self, command: VoiceCommand) -> bool {
        !self.closed && self.registry.register(command)
    }

    pub fn unregister_command(&mut self, phrase_or_alias: &str) -> bool {
        self.registry.unregister(phrase_or_alias)
    }

    pub fn commands(&self) -> Vec<&VoiceCommand> {
        self.registry.commands()
    }

    pub fn help_text(&self) -> String {
        self.registry.help_text()
    }

    /// Read the available commands aloud.
    pub fn announce_help(&mut self) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        let help = self.registry.help_text();
        self.synthesizer.speak_instruction(&help)
    }

    // ── Engine events ──────────────────────────────────────────────

    /// Feed one recognition engine event through the session.
    pub fn handle_recognition_event(&mut self, event: RecognitionEvent) {
        if self.closed {
            tracing::trace!(?event, "Ignoring recognition event after teardown");
            return;
        }
        match self.recognizer.handle_event(event) {
            Some(RecognizerOutput::Transcript(transcript)) => self.dispatch(&transcript),
            Some(RecognizerOutput::Failure(message)) => self.report_error(&message),
            None => {}
        }
    }

    /// Feed one synthesis engine event through the session.
    pub fn handle_synthesis_event(&mut self, event: SynthesisEvent) {
        if self.closed {
            tracing::trace!(id = %event.id, "Ignoring synthesis event after teardown");
            return;
        }
        self.synthesizer.handle_event(event);
    }

    /// Delay of a recognizer restart that must be performed later with
    /// [`resume_recognition`](Self::resume_recognition).
    pub fn take_scheduled_restart(&mut self) -> Option<Duration> {
        self.recognizer.take_scheduled_restart()
    }

    pub const fn is_restart_pending(&self) -> bool {
        self.recognizer.is_restart_pending()
    }

    /// Perform a delayed recognizer restart.
    pub fn resume_recognition(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.recognizer.restart() {
            self.report_error(&e.to_string());
        }
    }

    // ── Speech ─────────────────────────────────────────────────────

    pub fn speak(
        &mut self,
        text: &str,
        options: SpeakOptions,
        callbacks: UtteranceCallbacks,
    ) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.speak(text, options, callbacks)
    }

    pub fn enqueue(
        &mut self,
        text: &str,
        options: SpeakOptions,
        callbacks: UtteranceCallbacks,
    ) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.enqueue(text, options, callbacks)
    }

    pub fn speak_notification(
        &mut self,
        text: &str,
        priority: NotificationPriority,
    ) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.speak_notification(text, priority)
    }

    pub fn speak_error(&mut self, text: &str) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.speak_error(text)
    }

    pub fn speak_instruction(&mut self, text: &str) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.speak_instruction(text)
    }

    pub fn read_message(&mut self, text: &str) -> Option<UtteranceId> {
        if self.closed {
            return None;
        }
        self.synthesizer.read_message(text)
    }

    pub fn pause_speech(&mut self) {
        self.synthesizer.pause();
    }

    pub fn resume_speech(&mut self) {
        self.synthesizer.resume();
    }

    pub fn cancel_speech(&mut self) {
        self.synthesizer.cancel();
    }

    pub fn voices(&self) -> Vec<VoiceDescriptor> {
        self.synthesizer.voices()
    }

    /// Voice that utterances in the session locale will use.
    pub fn preferred_voice(&self) -> Option<VoiceDescriptor> {
        self.synthesizer.preferred_voice(&self.settings.locale)
    }

    // ── Teardown ───────────────────────────────────────────────────

    /// Abort listening, cancel speech and forget every command.
    ///
    /// Events delivered afterwards are ignored and no callback fires.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.recognizer.abort();
        self.synthesizer.cancel();
        self.registry.clear();
        tracing::info!("Voice session closed");
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Capture is running or about to, and no stop is pending.
    const fn is_capture_requested(&self) -> bool {
        self.recognizer.is_active() && !self.recognizer.is_stopping()
    }

    fn dispatch(&mut self, transcript: &str) {
        match self.registry.dispatch(transcript) {
            Ok(phrase) => {
                self.events.emit(VoiceEvent::CommandRecognized(phrase.clone()));
                if self.settings.announce_commands {
                    self.confirm(&format!("{phrase} activated"));
                }
            }
            Err(e) => self.report_error(&e.to_string()),
        }
    }

    fn confirm(&mut self, text: &str) {
        let options = SpeakOptions::new().rate(self.settings.confirmation_rate);
        self.synthesizer
            .speak(text, options, UtteranceCallbacks::default());
    }

    fn report_error(&mut self, message: &str) {
        tracing::debug!(message, "Reporting voice error");
        self.events.emit(VoiceEvent::Error(message.to_string()));
        self.synthesizer.speak_error(message);
    }
}

impl Drop for VoiceSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for VoiceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("recognizer", &self.recognizer)
            .field("synthesizer", &self.synthesizer)
            .field("commands", &self.registry.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
