//! Speech recognizer: wraps a [`RecognitionEngine`] and turns its events
//! into normalised transcripts and user-facing error messages.
//!
//! Capture lifecycle:
//!
//! ```text
//!   Idle ──start()──▶ Active ──Started──▶ Listening
//!    ▲                  ▲                     │
//!    │                  └── restart ◀─ Ended ─┤ (continuous, not stopped manually)
//!    └──────────────────────────────── Ended ─┘ (stopped, single-shot, or attempts exhausted)
//! ```
//!
//! Restarts follow the configured [`RestartPolicy`], which bounds the number
//! of consecutive capture cycles that ended in an error. A zero delay restarts
//! inside event handling; a non-zero delay is left for the caller to schedule
//! (see [`SpeechRecognizer::take_scheduled_restart`]).

use std::time::Duration;

use carevoice_core::{
    RecognitionConfig, RecognitionEngine, RecognitionErrorCode, RecognitionEvent,
    RecognitionResult, RestartPolicy, normalize_phrase,
};

use crate::error::VoiceError;
use crate::events::{EventSink, VoiceEvent};

/// Reported when the restart policy gives up.
pub const RESTARTS_EXHAUSTED_MESSAGE: &str =
    "Voice navigation stopped after repeated errors. Please turn it on again.";

/// What the owner of the recognizer has to act on after an engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerOutput {
    /// A final, normalised, non-empty transcript.
    Transcript(String),
    /// A user-facing error message.
    Failure(String),
}

pub struct SpeechRecognizer {
    engine: Box<dyn RecognitionEngine>,
    config: RecognitionConfig,
    policy: RestartPolicy,
    events: EventSink,
    /// Capture requested and not finished (includes a pending restart).
    active: bool,
    /// Engine confirmed capture (`Started` seen, `Ended` not yet).
    listening: bool,
    manual_stop: bool,
    /// Start requested while a manual stop was still winding down.
    resume_requested: bool,
    /// The current capture cycle reported an error other than `no-speech`.
    cycle_failed: bool,
    /// Consecutive failed cycles.
    restart_attempts: u32,
    /// A delayed restart is waiting to be performed.
    restart_pending: bool,
    /// Delay of the pending restart, until the caller takes it.
    scheduled_restart: Option<Duration>,
}

impl SpeechRecognizer {
    pub fn new(
        mut engine: Box<dyn RecognitionEngine>,
        config: RecognitionConfig,
        policy: RestartPolicy,
        events: EventSink,
    ) -> Self {
        engine.configure(&config);
        Self {
            engine,
            config,
            policy,
            events,
            active: false,
            listening: false,
            manual_stop: false,
            resume_requested: false,
            cycle_failed: false,
            restart_attempts: 0,
            restart_pending: false,
            scheduled_restart: None,
        }
    }

    /// Whether the engine is currently capturing.
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether capture has been requested and not yet finished.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// Whether a manual stop was requested and the engine has not ended yet.
    pub const fn is_stopping(&self) -> bool {
        self.active && self.manual_stop
    }

    pub const fn restart_attempts(&self) -> u32 {
        self.restart_attempts
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Begin capturing. Does nothing if capture is already active.
    ///
    /// While a manual stop is winding down, the stop is withdrawn and capture
    /// starts again as soon as the engine reports the end of the old cycle.
    pub fn start(&mut self) -> Result<(), VoiceError> {
        if self.is_stopping() {
            tracing::info!("Start requested while stopping, resuming after the current cycle");
            self.manual_stop = false;
            self.resume_requested = true;
            return Ok(());
        }
        if self.active {
            tracing::debug!("Recognizer already active, ignoring start");
            return Ok(());
        }
        if !self.engine.is_available() {
            tracing::warn!("No speech recognition engine available");
            return Err(VoiceError::RecognitionUnsupported);
        }

        self.manual_stop = false;
        self.cycle_failed = false;
        self.restart_attempts = 0;
        self.restart_pending = false;
        self.scheduled_restart = None;

        self.engine.start()?;
        self.active = true;
        tracing::info!(
            locale = %self.config.locale,
            continuous = self.config.continuous,
            "Speech recognition started"
        );
        Ok(())
    }

    /// Stop capturing. Suppresses the automatic restart.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.manual_stop = true;

        // The engine was already told to stop before the start came in.
        if std::mem::take(&mut self.resume_requested) {
            tracing::debug!("Resume withdrawn, stop still pending");
            return;
        }

        // Between cycles there is no running capture to wait on.
        if self.restart_pending {
            self.finish();
            tracing::info!("Speech recognition stopped before pending restart");
            return;
        }

        tracing::info!("Stopping speech recognition");
        self.engine.stop();
    }

    /// Abort capture immediately and discard pending audio.
    pub fn abort(&mut self) {
        if self.active && !self.restart_pending {
            self.engine.abort();
        }
        self.finish();
    }

    /// Take the delay of a restart that must be performed later via
    /// [`restart`](Self::restart). Returns each delay once.
    pub fn take_scheduled_restart(&mut self) -> Option<Duration> {
        self.scheduled_restart.take()
    }

    /// Whether a delayed restart is waiting.
    pub const fn is_restart_pending(&self) -> bool {
        self.restart_pending
    }

    /// Perform a pending delayed restart. Does nothing if capture was
    /// stopped in the meantime.
    pub fn restart(&mut self) -> Result<(), VoiceError> {
        if !self.restart_pending || !self.active {
            return Ok(());
        }
        self.restart_pending = false;
        self.restart_now()
    }

    // ── Engine events ──────────────────────────────────────────────

    /// Handle one engine event.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<RecognizerOutput> {
        match event {
            RecognitionEvent::Started => {
                self.set_listening(true);
                None
            }
            RecognitionEvent::Result(result) => self.handle_result(result),
            RecognitionEvent::Error(code) => {
                tracing::warn!(code = code.as_str(), "Speech recognition error");
                if code != RecognitionErrorCode::NoSpeech {
                    self.cycle_failed = true;
                }
                Some(RecognizerOutput::Failure(code.message().to_string()))
            }
            RecognitionEvent::Ended => self.handle_end(),
        }
    }

    fn handle_result(&mut self, result: RecognitionResult) -> Option<RecognizerOutput> {
        if !self.active {
            tracing::debug!("Ignoring recognition result while idle");
            return None;
        }
        if !result.is_final {
            self.events.emit(VoiceEvent::Transcript {
                text: result.transcript,
                is_final: false,
            });
            return None;
        }

        let transcript = normalize_phrase(&result.transcript);
        if transcript.is_empty() {
            return None;
        }

        tracing::debug!(
            transcript = %transcript,
            confidence = result.confidence_score,
            "Final transcript"
        );
        self.restart_attempts = 0;
        self.events.emit(VoiceEvent::Transcript {
            text: transcript.clone(),
            is_final: true,
        });
        Some(RecognizerOutput::Transcript(transcript))
    }

    fn handle_end(&mut self) -> Option<RecognizerOutput> {
        self.set_listening(false);

        if !self.active {
            return None;
        }
        if std::mem::take(&mut self.resume_requested) {
            tracing::info!("Resuming speech recognition after stop");
            self.cycle_failed = false;
            self.restart_attempts = 0;
            return self
                .restart_now()
                .err()
                .map(|e| RecognizerOutput::Failure(e.to_string()));
        }
        if !self.config.continuous || self.manual_stop {
            self.finish();
            tracing::info!("Speech recognition ended");
            return None;
        }

        // Only cycles that failed count towards the ceiling; a clean end
        // (silence timeout, engine housekeeping) restarts straight away.
        if std::mem::take(&mut self.cycle_failed) {
            self.restart_attempts = self.restart_attempts.saturating_add(1);
        } else {
            self.restart_attempts = 0;
        }
        let attempt = self.restart_attempts;

        if attempt > 0 && !self.policy.allows(attempt) {
            tracing::warn!(
                attempts = attempt - 1,
                "Restart attempts exhausted, giving up on continuous listening"
            );
            self.finish();
            return Some(RecognizerOutput::Failure(
                RESTARTS_EXHAUSTED_MESSAGE.to_string(),
            ));
        }

        let delay = if attempt == 0 {
            Duration::ZERO
        } else {
            self.policy.delay_for(attempt)
        };
        if delay.is_zero() {
            tracing::debug!(attempt, "Restarting continuous recognition");
            self.restart_now()
                .err()
                .map(|e| RecognizerOutput::Failure(e.to_string()))
        } else {
            tracing::debug!(attempt, delay_ms = delay.as_millis(), "Scheduling recognition restart");
            self.restart_pending = true;
            self.scheduled_restart = Some(delay);
            None
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn restart_now(&mut self) -> Result<(), VoiceError> {
        if let Err(e) = self.engine.start() {
            tracing::warn!(error = %e, "Failed to restart speech recognition");
            self.finish();
            return Err(e.into());
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.active = false;
        self.manual_stop = false;
        self.resume_requested = false;
        self.restart_pending = false;
        self.scheduled_restart = None;
        self.set_listening(false);
    }

    fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            self.listening = listening;
            self.events.emit(VoiceEvent::ListeningChanged(listening));
        }
    }
}

impl std::fmt::Debug for SpeechRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechRecognizer")
            .field("config", &self.config)
            .field("active", &self.active)
            .field("listening", &self.listening)
            .field("restart_attempts", &self.restart_attempts)
            .finish_non_exhaustive()
    }
}
