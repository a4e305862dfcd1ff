//! Console speech engines.
//!
//! Typed lines stand in for the microphone and utterances are printed
//! instead of played. Both engines report their events through the session
//! input channel, exactly like a platform engine's callbacks would.
//!
//! Line syntax for `listen`:
//!
//! | Line | Meaning |
//! |---|---|
//! | `go home` | final transcript |
//! | `!no-speech` | engine error with that code, then end of capture |
//! | `/listen`, `/stop`, `/help`, `/quit` | session controls |

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use carevoice_core::{
    EngineError, RecognitionConfig, RecognitionEngine, RecognitionErrorCode, RecognitionEvent,
    RecognitionResult, SynthesisEngine, SynthesisEvent, Utterance, VoiceDescriptor,
};
use carevoice_voice::{SessionCommand, SessionInput};
use tokio::sync::mpsc::UnboundedSender;

/// Prefix of lines that simulate an engine error code.
pub const ERROR_PREFIX: char = '!';

/// Prefix of lines that control the session.
pub const CONTROL_PREFIX: char = '/';

/// What one typed line stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// Blank or unknown line.
    Nothing,
    /// Session control, delivered whether or not capture is running.
    Control(SessionInput),
    /// Recognition events, delivered only while capturing.
    Speech(Vec<RecognitionEvent>),
}

/// Decode one typed line.
pub fn parse_line(line: &str, continuous: bool) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Nothing;
    }

    if let Some(control) = line.strip_prefix(CONTROL_PREFIX) {
        let input = match control.trim().to_ascii_lowercase().as_str() {
            "listen" => SessionInput::Command(SessionCommand::StartListening),
            "stop" => SessionInput::Command(SessionCommand::StopListening),
            "help" => SessionInput::Command(SessionCommand::AnnounceHelp),
            "quit" | "exit" => SessionInput::Shutdown,
            other => {
                tracing::warn!(control = other, "Unknown console control");
                return ConsoleInput::Nothing;
            }
        };
        return ConsoleInput::Control(input);
    }

    if let Some(code) = line.strip_prefix(ERROR_PREFIX) {
        return ConsoleInput::Speech(vec![
            RecognitionEvent::Error(RecognitionErrorCode::from_platform(code)),
            RecognitionEvent::Ended,
        ]);
    }

    let mut events = vec![RecognitionEvent::Result(RecognitionResult::final_text(line))];
    if !continuous {
        events.push(RecognitionEvent::Ended);
    }
    ConsoleInput::Speech(events)
}

// ── Recognition ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CaptureState {
    capturing: bool,
    continuous: bool,
    /// Speech typed while no capture was running, replayed on the next start.
    backlog: VecDeque<Vec<RecognitionEvent>>,
}

/// Capture state shared between the engine and the stdin reader thread.
#[derive(Debug, Default)]
struct SharedCapture(Mutex<CaptureState>);

impl SharedCapture {
    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver the events of one typed phrase, or hold them until capture
    /// resumes. Returns `false` once the session is gone.
    fn accept(&self, inputs: &UnboundedSender<SessionInput>, events: Vec<RecognitionEvent>) -> bool {
        let mut state = self.lock();
        if !state.capturing {
            tracing::debug!(backlog = state.backlog.len() + 1, "Not capturing, holding phrase");
            state.backlog.push_back(events);
            return true;
        }
        deliver(&mut state, inputs, events)
    }
}

/// Send one phrase's events. A trailing `Ended` closes the capture.
fn deliver(
    state: &mut CaptureState,
    inputs: &UnboundedSender<SessionInput>,
    events: Vec<RecognitionEvent>,
) -> bool {
    if events.last() == Some(&RecognitionEvent::Ended) {
        state.capturing = false;
    }
    events.into_iter().all(|event| send(inputs, event.into()))
}

/// Recognition engine reading transcripts from stdin.
///
/// The stdin reader thread starts with the first capture and lives for the
/// rest of the process. Phrases typed between captures are held and heard
/// by the next one. End of input shuts the session down.
pub struct ConsoleRecognition {
    inputs: UnboundedSender<SessionInput>,
    state: Arc<SharedCapture>,
    reader_started: bool,
}

impl ConsoleRecognition {
    pub fn new(inputs: UnboundedSender<SessionInput>) -> Self {
        Self {
            inputs,
            state: Arc::new(SharedCapture::default()),
            reader_started: false,
        }
    }

    fn spawn_reader(&mut self) -> Result<(), EngineError> {
        if self.reader_started {
            return Ok(());
        }
        let inputs = self.inputs.clone();
        let state = Arc::clone(&self.state);
        std::thread::Builder::new()
            .name("carevoice-stdin".to_string())
            .spawn(move || read_stdin(&inputs, &state))
            .map_err(|e| EngineError::Failed(format!("failed to read stdin: {e}")))?;
        self.reader_started = true;
        Ok(())
    }

    fn end_capture(&self, discard_backlog: bool) {
        let mut state = self.state.lock();
        if discard_backlog {
            state.backlog.clear();
        }
        if std::mem::take(&mut state.capturing) {
            send(&self.inputs, RecognitionEvent::Ended.into());
        }
    }
}

impl RecognitionEngine for ConsoleRecognition {
    fn is_available(&self) -> bool {
        true
    }

    fn configure(&mut self, config: &RecognitionConfig) {
        self.state.lock().continuous = config.continuous;
    }

    fn start(&mut self) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock();
            if state.capturing {
                return Err(EngineError::AlreadyStarted);
            }
            state.capturing = true;
            send(&self.inputs, RecognitionEvent::Started.into());
            while state.capturing {
                let Some(events) = state.backlog.pop_front() else {
                    break;
                };
                if !deliver(&mut state, &self.inputs, events) {
                    break;
                }
            }
        }

        if let Err(e) = self.spawn_reader() {
            self.state.lock().capturing = false;
            return Err(e);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.end_capture(false);
    }

    fn abort(&mut self) {
        self.end_capture(true);
    }
}

fn read_stdin(inputs: &UnboundedSender<SessionInput>, state: &SharedCapture) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let continuous = state.lock().continuous;
        let delivered = match parse_line(&line, continuous) {
            ConsoleInput::Nothing => true,
            ConsoleInput::Control(input) => send(inputs, input),
            ConsoleInput::Speech(events) => state.accept(inputs, events),
        };
        if !delivered {
            return;
        }
    }

    tracing::debug!("Console input closed");
    send(inputs, SessionInput::Shutdown);
}

/// Send to the session; `false` once the driver is gone.
fn send(inputs: &UnboundedSender<SessionInput>, input: SessionInput) -> bool {
    if inputs.send(input).is_err() {
        tracing::trace!("Session input channel closed");
        return false;
    }
    true
}

// ── Synthesis ──────────────────────────────────────────────────────

/// Voices offered by the console synthesizer.
pub fn console_voices() -> Vec<VoiceDescriptor> {
    vec![
        VoiceDescriptor::new("Console English (US)", "en-US").as_default(),
        VoiceDescriptor::new("Console English (UK)", "en-GB"),
        VoiceDescriptor::new("Console Spanish", "es-ES"),
    ]
}

/// Synthesis engine printing each utterance to stdout.
///
/// Printing is instantaneous, so every accepted utterance is reported as
/// started and ended straight away.
pub struct ConsoleSynthesis {
    inputs: UnboundedSender<SessionInput>,
    voices: Vec<VoiceDescriptor>,
}

impl ConsoleSynthesis {
    pub fn new(inputs: UnboundedSender<SessionInput>) -> Self {
        Self {
            inputs,
            voices: console_voices(),
        }
    }
}

/// Printed form of an utterance.
pub fn render_utterance(utterance: &Utterance) -> String {
    let voice = utterance.voice.as_deref().unwrap_or(&utterance.locale);
    format!(
        "[{voice} | rate {:.2} pitch {:.2} volume {:.2}] {}",
        utterance.prosody.rate, utterance.prosody.pitch, utterance.prosody.volume, utterance.text
    )
}

impl SynthesisEngine for ConsoleSynthesis {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), EngineError> {
        println!("{}", render_utterance(utterance));
        send(&self.inputs, SynthesisEvent::started(utterance.id).into());
        send(&self.inputs, SynthesisEvent::ended(utterance.id).into());
        Ok(())
    }

    fn cancel(&mut self) {
        tracing::debug!("Console speech cancelled");
    }

    fn pause(&mut self) {
        tracing::debug!("Console speech paused");
    }

    fn resume(&mut self) {
        tracing::debug!("Console speech resumed");
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.clone()
    }
}
