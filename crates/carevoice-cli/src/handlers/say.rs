//! Say command handler.
//!
//! Speaks one message through the console synthesizer with the prosody of
//! the chosen style.

use carevoice_core::{NotificationPriority, VoiceSettings};
use carevoice_voice::{SessionInput, VoiceSession, run_session};

use crate::bootstrap::bootstrap;
use crate::commands::SayStyle;
use crate::error::CliError;

/// Execute the say command.
pub async fn execute(
    settings: VoiceSettings,
    text: &str,
    style: SayStyle,
    priority: NotificationPriority,
) -> Result<(), CliError> {
    let mut ctx = bootstrap(settings)?;

    if speak(&mut ctx.session, text, style, priority).is_none() {
        return Err(CliError::Arguments("nothing to say".to_string()));
    }

    // Let the driver deliver the engine's playback events before closing.
    let _ = ctx.inputs.send(SessionInput::Shutdown);
    run_session(ctx.session, ctx.input_rx).await;
    Ok(())
}

fn speak(
    session: &mut VoiceSession,
    text: &str,
    style: SayStyle,
    priority: NotificationPriority,
) -> Option<carevoice_core::UtteranceId> {
    tracing::debug!(?style, %priority, "Speaking message");
    match style {
        SayStyle::Notification => session.speak_notification(text, priority),
        SayStyle::Instruction => session.speak_instruction(text),
        SayStyle::Message => session.read_message(text),
        SayStyle::Error => session.speak_error(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let err = execute(
            VoiceSettings::default(),
            "   ",
            SayStyle::Notification,
            NotificationPriority::Medium,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_say_runs_to_completion() {
        execute(
            VoiceSettings::default(),
            "Time for your afternoon pills",
            SayStyle::Notification,
            NotificationPriority::High,
        )
        .await
        .unwrap();
    }
}
