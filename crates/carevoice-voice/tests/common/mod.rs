//! Recording fake engines shared by the integration tests.
//!
//! The fakes never emit events on their own; tests deliver engine events by
//! calling the session or component `handle_*` methods, and inspect what was
//! asked of the engine through the probe each fake hands out.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use carevoice_core::{
    EngineError, RecognitionConfig, RecognitionEngine, RecognitionEvent, SynthesisEngine,
    Utterance, VoiceDescriptor, VoiceSettings,
};
use carevoice_voice::{UtteranceCallbacks, VoiceEvent, VoiceSession, drain_events};
use tokio::sync::mpsc;

// ── Recognition ────────────────────────────────────────────────────

/// Calls made on a [`FakeRecognition`].
#[derive(Debug, Clone, Default)]
pub struct RecognitionProbe {
    calls: Arc<Mutex<Vec<&'static str>>>,
    config: Arc<Mutex<Option<RecognitionConfig>>>,
}

impl RecognitionProbe {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn config(&self) -> Option<RecognitionConfig> {
        self.config.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

pub struct FakeRecognition {
    probe: RecognitionProbe,
    available: bool,
}

impl FakeRecognition {
    pub fn new() -> (Self, RecognitionProbe) {
        let probe = RecognitionProbe::default();
        (
            Self {
                probe: probe.clone(),
                available: true,
            },
            probe,
        )
    }

    pub fn unavailable() -> (Self, RecognitionProbe) {
        let (mut engine, probe) = Self::new();
        engine.available = false;
        (engine, probe)
    }
}

impl RecognitionEngine for FakeRecognition {
    fn is_available(&self) -> bool {
        self.available
    }

    fn configure(&mut self, config: &RecognitionConfig) {
        *self.probe.config.lock().unwrap() = Some(config.clone());
    }

    fn start(&mut self) -> Result<(), EngineError> {
        self.probe.record("start");
        Ok(())
    }

    fn stop(&mut self) {
        self.probe.record("stop");
    }

    fn abort(&mut self) {
        self.probe.record("abort");
    }
}

// ── Synthesis ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisCall {
    Speak(Utterance),
    Cancel,
    Pause,
    Resume,
}

/// Calls made on a [`FakeSynthesis`].
#[derive(Debug, Clone, Default)]
pub struct SynthesisProbe {
    calls: Arc<Mutex<Vec<SynthesisCall>>>,
}

impl SynthesisProbe {
    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Utterances handed to the engine, in order.
    pub fn spoken(&self) -> Vec<Utterance> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                SynthesisCall::Speak(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }

    pub fn last_spoken(&self) -> Option<Utterance> {
        self.spoken().pop()
    }

    pub fn cancels(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == SynthesisCall::Cancel)
            .count()
    }
}

pub struct FakeSynthesis {
    probe: SynthesisProbe,
    voices: Vec<VoiceDescriptor>,
}

impl FakeSynthesis {
    pub fn new() -> (Self, SynthesisProbe) {
        let probe = SynthesisProbe::default();
        (
            Self {
                probe: probe.clone(),
                voices: vec![
                    VoiceDescriptor::new("Samantha", "en-US").as_default(),
                    VoiceDescriptor::new("Daniel", "en-GB"),
                ],
            },
            probe,
        )
    }
}

impl SynthesisEngine for FakeSynthesis {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), EngineError> {
        self.probe
            .calls
            .lock()
            .unwrap()
            .push(SynthesisCall::Speak(utterance.clone()));
        Ok(())
    }

    fn cancel(&mut self) {
        self.probe.calls.lock().unwrap().push(SynthesisCall::Cancel);
    }

    fn pause(&mut self) {
        self.probe.calls.lock().unwrap().push(SynthesisCall::Pause);
    }

    fn resume(&mut self) {
        self.probe.calls.lock().unwrap().push(SynthesisCall::Resume);
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.clone()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

pub struct Harness {
    pub session: VoiceSession,
    pub events: mpsc::UnboundedReceiver<VoiceEvent>,
    pub recognition: RecognitionProbe,
    pub synthesis: SynthesisProbe,
}

/// A session over fake engines.
pub fn harness(settings: VoiceSettings) -> Harness {
    let (recognition_engine, recognition) = FakeRecognition::new();
    let (synthesis_engine, synthesis) = FakeSynthesis::new();
    let (session, events) = VoiceSession::new(
        Box::new(recognition_engine),
        Box::new(synthesis_engine),
        settings,
    )
    .unwrap();
    Harness {
        session,
        events,
        recognition,
        synthesis,
    }
}

/// A session that is already listening, with the start confirmation turned
/// off and the startup events drained.
pub fn listening_harness(settings: VoiceSettings) -> Harness {
    let mut h = harness(VoiceSettings {
        announce_listening: false,
        ..settings
    });
    h.session.start_listening();
    h.session.handle_recognition_event(RecognitionEvent::Started);
    drain_events(&mut h.events);
    h
}

/// Shared, ordered log of callback invocations.
pub type CallbackLog = Arc<Mutex<Vec<String>>>;

/// Callbacks that append `"<label> start"`, `"<label> end"` or
/// `"<label> error: <message>"` to `log`.
pub fn logging_callbacks(log: &CallbackLog, label: &str) -> UtteranceCallbacks {
    let (start_log, end_log, error_log) = (Arc::clone(log), Arc::clone(log), Arc::clone(log));
    let (start_label, end_label, error_label) =
        (label.to_string(), label.to_string(), label.to_string());
    UtteranceCallbacks::new()
        .on_start(move || start_log.lock().unwrap().push(format!("{start_label} start")))
        .on_end(move || end_log.lock().unwrap().push(format!("{end_label} end")))
        .on_error(move |msg| {
            error_log
                .lock()
                .unwrap()
                .push(format!("{error_label} error: {msg}"));
        })
}
