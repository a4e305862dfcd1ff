//! Integration tests for the speech synthesizer queue and prosody presets.
//!
//! Engine lifecycle events are simulated by feeding `SynthesisEvent`s for
//! the utterance ids the synthesizer hands out.

mod common;

use std::sync::{Arc, Mutex};

use carevoice_core::{NotificationPriority, SpeakOptions, SynthesisEvent, UtteranceId};
use carevoice_voice::{
    EventSink, SpeechSynthesizer, SynthesizerConfig, UtteranceCallbacks, VoiceEvent, drain_events,
};
use common::{CallbackLog, FakeSynthesis, SynthesisProbe, logging_callbacks};

fn synthesizer() -> (
    SpeechSynthesizer,
    SynthesisProbe,
    tokio::sync::mpsc::UnboundedReceiver<VoiceEvent>,
) {
    let (engine, probe) = FakeSynthesis::new();
    let (events, rx) = EventSink::channel();
    let synth =
        SpeechSynthesizer::new(Box::new(engine), SynthesizerConfig::default(), events).unwrap();
    (synth, probe, rx)
}

fn new_log() -> CallbackLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Play the active utterance to completion.
fn finish(synth: &mut SpeechSynthesizer, id: UtteranceId) {
    synth.handle_event(SynthesisEvent::started(id));
    synth.handle_event(SynthesisEvent::ended(id));
}

#[test]
fn blank_text_never_reaches_engine() {
    let (mut synth, probe, _rx) = synthesizer();

    assert!(synth.speak("", SpeakOptions::new(), UtteranceCallbacks::new()).is_none());
    assert!(synth.speak("   ", SpeakOptions::new(), UtteranceCallbacks::new()).is_none());
    assert!(synth.enqueue("\t\n", SpeakOptions::new(), UtteranceCallbacks::new()).is_none());

    assert!(probe.calls().is_empty());
}

#[test]
fn three_enqueues_play_in_order() {
    let (mut synth, probe, _rx) = synthesizer();
    let log = new_log();

    let ids: Vec<UtteranceId> = ["one", "two", "three"]
        .into_iter()
        .map(|text| {
            synth
                .enqueue(text, SpeakOptions::new(), logging_callbacks(&log, text))
                .unwrap()
        })
        .collect();

    // Only the first is handed to the engine while it plays.
    assert_eq!(probe.spoken_texts(), ["one"]);
    assert_eq!(synth.queued_len(), 2);

    for (played, id) in ids.iter().enumerate() {
        assert_eq!(probe.spoken().len(), played + 1);
        finish(&mut synth, *id);
    }

    assert_eq!(probe.spoken_texts(), ["one", "two", "three"]);
    assert_eq!(
        *log.lock().unwrap(),
        [
            "one start", "one end", "two start", "two end", "three start", "three end"
        ]
    );
    assert!(!synth.is_speaking());
}

#[test]
fn cancel_mid_queue_drops_unplayed_text() {
    let (mut synth, probe, _rx) = synthesizer();
    let log = new_log();

    let first = synth
        .enqueue("one", SpeakOptions::new(), logging_callbacks(&log, "one"))
        .unwrap();
    synth.enqueue("two", SpeakOptions::new(), logging_callbacks(&log, "two"));
    synth.enqueue("three", SpeakOptions::new(), logging_callbacks(&log, "three"));
    synth.handle_event(SynthesisEvent::started(first));

    synth.cancel();
    // The engine still reports the end of the cancelled utterance.
    synth.handle_event(SynthesisEvent::ended(first));

    assert_eq!(probe.spoken_texts(), ["one"]);
    assert_eq!(probe.cancels(), 1);
    assert_eq!(*log.lock().unwrap(), ["one start"]);
    assert_eq!(synth.queued_len(), 0);
    assert!(!synth.is_speaking());
}

#[test]
fn speak_preempts_queue_without_firing_callbacks() {
    let (mut synth, probe, _rx) = synthesizer();
    let log = new_log();

    let first = synth
        .enqueue("one", SpeakOptions::new(), logging_callbacks(&log, "one"))
        .unwrap();
    synth.enqueue("two", SpeakOptions::new(), logging_callbacks(&log, "two"));
    synth.handle_event(SynthesisEvent::started(first));

    let urgent = synth
        .speak("urgent", SpeakOptions::new(), logging_callbacks(&log, "urgent"))
        .unwrap();
    synth.handle_event(SynthesisEvent::ended(first));
    finish(&mut synth, urgent);

    assert_eq!(probe.spoken_texts(), ["one", "urgent"]);
    assert_eq!(probe.cancels(), 1);
    assert_eq!(
        *log.lock().unwrap(),
        ["one start", "urgent start", "urgent end"]
    );
}

#[test]
fn queue_continues_after_failure() {
    let (mut synth, probe, _rx) = synthesizer();
    let log = new_log();

    let first = synth
        .enqueue("one", SpeakOptions::new(), logging_callbacks(&log, "one"))
        .unwrap();
    let second = synth
        .enqueue("two", SpeakOptions::new(), logging_callbacks(&log, "two"))
        .unwrap();

    synth.handle_event(SynthesisEvent::started(first));
    synth.handle_event(SynthesisEvent::failed(first, "audio-busy"));
    // A trailing end for the failed utterance is stale.
    synth.handle_event(SynthesisEvent::ended(first));
    finish(&mut synth, second);

    assert_eq!(probe.spoken_texts(), ["one", "two"]);
    assert_eq!(
        *log.lock().unwrap(),
        ["one start", "one error: audio-busy", "two start", "two end"]
    );
}

#[test]
fn critical_notification_prosody() {
    let (mut synth, probe, _rx) = synthesizer();

    synth.speak_notification("Blood pressure reading is high", NotificationPriority::Critical);

    let utterance = probe.last_spoken().unwrap();
    assert!((utterance.prosody.rate - 1.0).abs() < f32::EPSILON);
    assert!((utterance.prosody.pitch - 1.2).abs() < f32::EPSILON);
    assert!((utterance.prosody.volume - 1.0).abs() < f32::EPSILON);
}

#[test]
fn notification_presets_by_priority() {
    let (mut synth, probe, _rx) = synthesizer();
    let expected = [
        (NotificationPriority::High, (0.95, 1.1, 1.0)),
        (NotificationPriority::Medium, (0.9, 1.0, 0.9)),
        (NotificationPriority::Low, (0.85, 0.9, 0.8)),
    ];

    for (priority, (rate, pitch, volume)) in expected {
        synth.speak_notification("reminder", priority);
        let p = probe.last_spoken().unwrap().prosody;
        assert!((p.rate - rate).abs() < f32::EPSILON, "{priority}");
        assert!((p.pitch - pitch).abs() < f32::EPSILON, "{priority}");
        assert!((p.volume - volume).abs() < f32::EPSILON, "{priority}");
    }
}

#[test]
fn speaking_state_follows_engine_events() {
    let (mut synth, _probe, mut rx) = synthesizer();

    let id = synth
        .speak("hello", SpeakOptions::new(), UtteranceCallbacks::new())
        .unwrap();
    assert!(!synth.is_speaking());

    finish(&mut synth, id);

    assert_eq!(
        drain_events(&mut rx),
        vec![
            VoiceEvent::SpeakingChanged(true),
            VoiceEvent::SpeakingChanged(false),
        ]
    );
}

#[test]
fn locale_override_selects_voice() {
    let (mut synth, probe, _rx) = synthesizer();

    synth.speak(
        "Good morning",
        SpeakOptions::new().locale("en-GB"),
        UtteranceCallbacks::new(),
    );

    let utterance = probe.last_spoken().unwrap();
    assert_eq!(utterance.locale, "en-GB");
    assert_eq!(utterance.voice.as_deref(), Some("Daniel"));
}

#[test]
fn pause_and_resume_only_while_speaking() {
    let (mut synth, probe, _rx) = synthesizer();

    synth.pause();
    assert!(probe.calls().is_empty());

    let id = synth
        .speak("hello", SpeakOptions::new(), UtteranceCallbacks::new())
        .unwrap();
    synth.handle_event(SynthesisEvent::started(id));
    synth.pause();
    synth.resume();
    synth.resume();

    assert_eq!(
        probe.calls()[1..],
        [common::SynthesisCall::Pause, common::SynthesisCall::Resume]
    );
}
