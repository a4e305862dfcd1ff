//! Speech synthesizer. Serialises utterances onto a [`SynthesisEngine`]
//! and applies prosody presets.
//!
//! At most one utterance is handed to the engine at a time. [`speak`]
//! preempts everything; [`enqueue`] waits its turn. The next queued utterance
//! starts when the engine reports the active one ended or failed.
//!
//! [`speak`]: SpeechSynthesizer::speak
//! [`enqueue`]: SpeechSynthesizer::enqueue

use std::collections::VecDeque;

use carevoice_core::{
    NotificationPriority, Prosody, SpeakOptions, SynthesisEngine, SynthesisEvent,
    SynthesisEventKind, Utterance, UtteranceId, VoiceDescriptor, VoiceSettings, language_subtag,
};

use crate::error::VoiceError;
use crate::events::{EventSink, VoiceEvent};

/// Rate and pitch for spoken error messages.
pub const ERROR_RATE: f32 = 0.85;
pub const ERROR_PITCH: f32 = 0.9;

/// Rate and pitch for step-by-step instructions.
pub const INSTRUCTION_RATE: f32 = 0.8;
pub const INSTRUCTION_PITCH: f32 = 1.0;

/// Rate and pitch for reading messages aloud.
pub const MESSAGE_RATE: f32 = 0.9;
pub const MESSAGE_PITCH: f32 = 1.0;

// ── Callbacks ──────────────────────────────────────────────────────

type Callback = Box<dyn FnOnce() + Send>;
type ErrorCallback = Box<dyn FnOnce(&str) + Send>;

/// Per-utterance lifecycle callbacks. Each fires at most once, and none fire
/// for an utterance that is cancelled before reaching that point.
#[derive(Default)]
pub struct UtteranceCallbacks {
    on_start: Option<Callback>,
    on_end: Option<Callback>,
    on_error: Option<ErrorCallback>,
}

impl UtteranceCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_start(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_end(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    fn started(&mut self) {
        if let Some(f) = self.on_start.take() {
            f();
        }
    }

    fn ended(mut self) {
        if let Some(f) = self.on_end.take() {
            f();
        }
    }

    fn failed(mut self, message: &str) {
        if let Some(f) = self.on_error.take() {
            f(message);
        }
    }
}

impl std::fmt::Debug for UtteranceCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtteranceCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// Defaults applied to utterances that do not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizerConfig {
    pub locale: String,
    pub default_prosody: Prosody,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self::from(&VoiceSettings::default())
    }
}

impl From<&VoiceSettings> for SynthesizerConfig {
    fn from(settings: &VoiceSettings) -> Self {
        Self {
            locale: settings.locale.clone(),
            default_prosody: settings.default_prosody,
        }
    }
}

// ── Synthesizer ────────────────────────────────────────────────────

#[derive(Debug)]
struct Pending {
    utterance: Utterance,
    callbacks: UtteranceCallbacks,
}

pub struct SpeechSynthesizer {
    engine: Box<dyn SynthesisEngine>,
    config: SynthesizerConfig,
    events: EventSink,
    current: Option<Pending>,
    queue: VecDeque<Pending>,
    next_id: u64,
    speaking: bool,
    paused: bool,
}

impl SpeechSynthesizer {
    /// Wrap an engine. Fails if the platform has no speech synthesis.
    pub fn new(
        engine: Box<dyn SynthesisEngine>,
        config: SynthesizerConfig,
        events: EventSink,
    ) -> Result<Self, VoiceError> {
        if !engine.is_available() {
            tracing::warn!("No speech synthesis engine available");
            return Err(VoiceError::SynthesisUnsupported);
        }
        Ok(Self {
            engine,
            config,
            events,
            current: None,
            queue: VecDeque::new(),
            next_id: 1,
            speaking: false,
            paused: false,
        })
    }

    /// Whether an utterance is playing (from its `Started` until the queue drains).
    pub const fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Utterances waiting behind the active one.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Id of the utterance the engine is working on.
    pub fn current_id(&self) -> Option<UtteranceId> {
        self.current.as_ref().map(|p| p.utterance.id)
    }

    pub const fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    // ── Speaking ───────────────────────────────────────────────────

    /// Speak now, discarding the active and queued utterances.
    ///
    /// Blank text is ignored and returns `None`.
    pub fn speak(
        &mut self,
        text: &str,
        options: SpeakOptions,
        callbacks: UtteranceCallbacks,
    ) -> Option<UtteranceId> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank utterance");
            return None;
        }

        self.discard_all();
        let pending = self.prepare(text, &options, callbacks);
        let id = pending.utterance.id;
        self.queue.push_back(pending);
        self.advance();
        Some(id)
    }

    /// Speak after everything already queued. Starts immediately when idle.
    pub fn enqueue(
        &mut self,
        text: &str,
        options: SpeakOptions,
        callbacks: UtteranceCallbacks,
    ) -> Option<UtteranceId> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank utterance");
            return None;
        }

        let pending = self.prepare(text, &options, callbacks);
        let id = pending.utterance.id;
        self.queue.push_back(pending);
        tracing::debug!(id = %id, queued = self.queue.len(), "Utterance enqueued");
        if self.current.is_none() {
            self.advance();
        }
        Some(id)
    }

    /// Speak a notification with the preset for its priority.
    pub fn speak_notification(
        &mut self,
        text: &str,
        priority: NotificationPriority,
    ) -> Option<UtteranceId> {
        tracing::debug!(priority = %priority, "Speaking notification");
        self.speak(
            text,
            SpeakOptions::from(priority.prosody()),
            UtteranceCallbacks::default(),
        )
    }

    /// Speak an error message, slower and lower.
    pub fn speak_error(&mut self, text: &str) -> Option<UtteranceId> {
        let options = SpeakOptions::new().rate(ERROR_RATE).pitch(ERROR_PITCH);
        self.speak(text, options, UtteranceCallbacks::default())
    }

    /// Speak step-by-step guidance at the slowest rate.
    pub fn speak_instruction(&mut self, text: &str) -> Option<UtteranceId> {
        let options = SpeakOptions::new()
            .rate(INSTRUCTION_RATE)
            .pitch(INSTRUCTION_PITCH);
        self.speak(text, options, UtteranceCallbacks::default())
    }

    /// Read a message aloud at a conversational pace.
    pub fn read_message(&mut self, text: &str) -> Option<UtteranceId> {
        let options = SpeakOptions::new().rate(MESSAGE_RATE).pitch(MESSAGE_PITCH);
        self.speak(text, options, UtteranceCallbacks::default())
    }

    // ── Playback control ───────────────────────────────────────────

    pub fn pause(&mut self) {
        if self.speaking && !self.paused {
            self.engine.pause();
            self.paused = true;
            tracing::debug!("Speech paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.engine.resume();
            self.paused = false;
            tracing::debug!("Speech resumed");
        }
    }

    /// Stop playback and drop every queued utterance. Their callbacks never fire.
    pub fn cancel(&mut self) {
        self.discard_all();
        self.set_speaking(false);
    }

    // ── Voices ─────────────────────────────────────────────────────

    pub fn voices(&self) -> Vec<VoiceDescriptor> {
        self.engine.voices()
    }

    /// Voice for `locale`: an exact tag match, else the first voice sharing
    /// its language.
    pub fn preferred_voice(&self, locale: &str) -> Option<VoiceDescriptor> {
        let voices = self.engine.voices();
        let language = language_subtag(locale);

        if let Some(exact) = voices.iter().find(|v| v.locale.eq_ignore_ascii_case(locale)) {
            return Some(exact.clone());
        }
        voices
            .into_iter()
            .find(|v| language_subtag(&v.locale).eq_ignore_ascii_case(language))
    }

    // ── Engine events ──────────────────────────────────────────────

    /// Handle one engine event. Events for utterances that are no longer
    /// active are ignored.
    pub fn handle_event(&mut self, event: SynthesisEvent) {
        let Some(current) = self.current.as_mut() else {
            tracing::trace!(id = %event.id, "Ignoring synthesis event while idle");
            return;
        };
        if current.utterance.id != event.id {
            tracing::trace!(id = %event.id, active = %current.utterance.id, "Ignoring stale synthesis event");
            return;
        }

        match event.kind {
            SynthesisEventKind::Started => {
                current.callbacks.started();
                self.set_speaking(true);
            }
            SynthesisEventKind::Ended => {
                if let Some(done) = self.current.take() {
                    tracing::debug!(id = %event.id, "Utterance finished");
                    done.callbacks.ended();
                }
                self.advance();
            }
            SynthesisEventKind::Failed(message) => {
                if let Some(failed) = self.current.take() {
                    tracing::warn!(id = %event.id, error = %message, "Utterance failed");
                    failed.callbacks.failed(&message);
                }
                self.advance();
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn prepare(&mut self, text: &str, options: &SpeakOptions, callbacks: UtteranceCallbacks) -> Pending {
        let id = UtteranceId(self.next_id);
        self.next_id += 1;

        let locale = options
            .locale
            .clone()
            .unwrap_or_else(|| self.config.locale.clone());
        let voice = self.preferred_voice(&locale).map(|v| v.name);

        Pending {
            utterance: Utterance {
                id,
                text: text.trim().to_string(),
                prosody: options.resolve(self.config.default_prosody),
                locale,
                voice,
            },
            callbacks,
        }
    }

    /// Hand queued utterances to the engine until one is accepted.
    fn advance(&mut self) {
        self.current = None;
        self.paused = false;

        while let Some(next) = self.queue.pop_front() {
            match self.engine.speak(&next.utterance) {
                Ok(()) => {
                    tracing::debug!(
                        id = %next.utterance.id,
                        rate = next.utterance.prosody.rate,
                        pitch = next.utterance.prosody.pitch,
                        remaining = self.queue.len(),
                        "Speaking utterance"
                    );
                    self.current = Some(next);
                    return;
                }
                Err(e) => {
                    tracing::warn!(id = %next.utterance.id, error = %e, "Engine rejected utterance");
                    next.callbacks.failed(&e.to_string());
                }
            }
        }

        self.set_speaking(false);
    }

    fn discard_all(&mut self) {
        let dropped = self.queue.len();
        self.queue.clear();
        self.paused = false;
        if self.current.take().is_some() {
            self.engine.cancel();
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded queued utterances");
        }
    }

    fn set_speaking(&mut self, speaking: bool) {
        if self.speaking != speaking {
            self.speaking = speaking;
            self.events.emit(VoiceEvent::SpeakingChanged(speaking));
        }
    }
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("config", &self.config)
            .field("current", &self.current_id())
            .field("queued", &self.queue.len())
            .field("speaking", &self.speaking)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}
