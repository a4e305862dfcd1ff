//! Listen command handler.
//!
//! Runs a voice session over the console engines until stdin closes,
//! `/quit` is typed or Ctrl-C is pressed.

use carevoice_core::VoiceSettings;
use carevoice_voice::{SessionCommand, SessionInput, VoiceEvent, run_session};
use tokio::sync::mpsc;

use crate::bootstrap::bootstrap;
use crate::console::{CONTROL_PREFIX, ERROR_PREFIX};
use crate::error::CliError;
use crate::navigation::DEFAULT_COMMANDS;

/// Execute the listen command.
pub async fn execute(mut settings: VoiceSettings, once: bool, quiet: bool) -> Result<(), CliError> {
    if once {
        settings.continuous = false;
    }
    if quiet {
        settings.announce_commands = false;
    }

    let mut ctx = bootstrap(settings)?;
    for command in DEFAULT_COMMANDS {
        ctx.session.register_command(command.to_voice_command(&ctx.inputs));
    }

    println!("Type what you would say, one phrase per line.");
    println!(
        "  {ERROR_PREFIX}<code> simulates an engine error (e.g. {ERROR_PREFIX}no-speech), \
         {CONTROL_PREFIX}listen {CONTROL_PREFIX}stop {CONTROL_PREFIX}help {CONTROL_PREFIX}quit control the session."
    );
    println!();

    let stop_when_idle = once.then(|| ctx.inputs.clone());
    let printer = tokio::spawn(print_events(ctx.events, stop_when_idle));

    let shutdown = ctx.inputs.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(SessionInput::Shutdown);
        }
    });

    if ctx
        .inputs
        .send(SessionCommand::StartListening.into())
        .is_err()
    {
        return Err(CliError::Io("session input channel closed".to_string()));
    }

    let session = run_session(ctx.session, ctx.input_rx).await;
    drop(session);

    printer
        .await
        .map_err(|e| CliError::Io(format!("event printer failed: {e}")))?;
    Ok(())
}

/// Print session events until the session is dropped.
///
/// With `stop_when_idle`, the session is shut down once listening ends.
async fn print_events(
    mut events: mpsc::UnboundedReceiver<VoiceEvent>,
    stop_when_idle: Option<mpsc::UnboundedSender<SessionInput>>,
) {
    while let Some(event) = events.recv().await {
        if let Some(line) = describe_event(&event) {
            eprintln!("{line}");
        }
        if event == VoiceEvent::ListeningChanged(false) {
            if let Some(inputs) = &stop_when_idle {
                let _ = inputs.send(SessionInput::Shutdown);
            }
        }
    }
}

/// One-line description of an event, or `None` for events not worth showing.
fn describe_event(event: &VoiceEvent) -> Option<String> {
    match event {
        VoiceEvent::ListeningChanged(true) => Some("(listening)".to_string()),
        VoiceEvent::ListeningChanged(false) => Some("(not listening)".to_string()),
        VoiceEvent::SpeakingChanged(_) => None,
        VoiceEvent::Transcript {
            text,
            is_final: true,
        } => Some(format!("heard: \"{text}\"")),
        VoiceEvent::Transcript { .. } => None,
        VoiceEvent::CommandRecognized(phrase) => Some(format!("command: {phrase}")),
        VoiceEvent::Error(message) => Some(format!("error: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_event() {
        assert_eq!(
            describe_event(&VoiceEvent::CommandRecognized("emergency".into())).as_deref(),
            Some("command: emergency")
        );
        assert_eq!(
            describe_event(&VoiceEvent::Transcript {
                text: "go home".into(),
                is_final: true,
            })
            .as_deref(),
            Some("heard: \"go home\"")
        );
        assert!(describe_event(&VoiceEvent::SpeakingChanged(true)).is_none());
        assert!(
            describe_event(&VoiceEvent::Transcript {
                text: "go".into(),
                is_final: false,
            })
            .is_none()
        );
    }
}
