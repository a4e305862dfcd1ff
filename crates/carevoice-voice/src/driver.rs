//! Async driver that runs a [`VoiceSession`] off an input channel.
//!
//! Engines and UI code push [`SessionInput`]s into the channel. The driver
//! applies them in order on one task and sleeps through backoff delays before
//! restarting the recognizer.

use std::ops::ControlFlow;

use carevoice_core::{NotificationPriority, RecognitionEvent, SpeakOptions, SynthesisEvent};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::session::VoiceSession;
use crate::synthesizer::UtteranceCallbacks;

/// A request from UI code, usually sent by a command action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    StartListening,
    StopListening,
    ToggleListening,
    /// Speak now with the default prosody.
    Speak(String),
    /// Speak a notification with the preset for its priority.
    Notify {
        text: String,
        priority: NotificationPriority,
    },
    /// Speak step-by-step guidance.
    Instruct(String),
    /// Read a message aloud.
    ReadMessage(String),
    /// Read the available commands aloud.
    AnnounceHelp,
    CancelSpeech,
}

/// Everything the driver feeds into a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    Recognition(RecognitionEvent),
    Synthesis(SynthesisEvent),
    Command(SessionCommand),
    /// Tear the session down and stop the driver.
    Shutdown,
}

impl From<RecognitionEvent> for SessionInput {
    fn from(event: RecognitionEvent) -> Self {
        Self::Recognition(event)
    }
}

impl From<SynthesisEvent> for SessionInput {
    fn from(event: SynthesisEvent) -> Self {
        Self::Synthesis(event)
    }
}

impl From<SessionCommand> for SessionInput {
    fn from(command: SessionCommand) -> Self {
        Self::Command(command)
    }
}

impl VoiceSession {
    /// Apply one input. Breaks on [`SessionInput::Shutdown`].
    pub fn handle_input(&mut self, input: SessionInput) -> ControlFlow<()> {
        match input {
            SessionInput::Recognition(event) => self.handle_recognition_event(event),
            SessionInput::Synthesis(event) => self.handle_synthesis_event(event),
            SessionInput::Command(command) => self.apply_command(command),
            SessionInput::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn apply_command(&mut self, command: SessionCommand) {
        tracing::debug!(?command, "Session command");
        match command {
            SessionCommand::StartListening => self.start_listening(),
            SessionCommand::StopListening => self.stop_listening(),
            SessionCommand::ToggleListening => self.toggle_listening(),
            SessionCommand::Speak(text) => {
                self.speak(&text, SpeakOptions::new(), UtteranceCallbacks::new());
            }
            SessionCommand::Notify { text, priority } => {
                self.speak_notification(&text, priority);
            }
            SessionCommand::Instruct(text) => {
                self.speak_instruction(&text);
            }
            SessionCommand::ReadMessage(text) => {
                self.read_message(&text);
            }
            SessionCommand::AnnounceHelp => {
                self.announce_help();
            }
            SessionCommand::CancelSpeech => self.cancel_speech(),
        }
    }
}

/// Drive `session` until `inputs` closes or [`SessionInput::Shutdown`]
/// arrives, then tear it down and hand it back.
pub async fn run_session(
    mut session: VoiceSession,
    mut inputs: mpsc::UnboundedReceiver<SessionInput>,
) -> VoiceSession {
    let mut restart_at: Option<Instant> = None;

    loop {
        if let Some(delay) = session.take_scheduled_restart() {
            tracing::debug!(delay_ms = delay.as_millis(), "Recognizer restart scheduled");
            restart_at = Some(Instant::now() + delay);
        }
        if !session.is_restart_pending() {
            restart_at = None;
        }
        let deadline = restart_at.unwrap_or_else(Instant::now);

        tokio::select! {
            input = inputs.recv() => {
                let Some(input) = input else {
                    tracing::debug!("Session input channel closed");
                    break;
                };
                if session.handle_input(input).is_break() {
                    tracing::debug!("Session shutdown requested");
                    break;
                }
            }
            () = sleep_until(deadline), if restart_at.is_some() => {
                restart_at = None;
                session.resume_recognition();
            }
        }
    }

    session.teardown();
    session
}
