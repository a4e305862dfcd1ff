//! Default healthcare navigation commands for `listen`.
//!
//! Each command's action either prints the screen it would open or sends a
//! request back to the running session.

use carevoice_core::{NotificationPriority, VoiceCommand};
use carevoice_voice::{SessionCommand, SessionInput};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// What a navigation command does when recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Open a screen.
    Navigate(&'static str),
    /// Raise a spoken notification.
    Notify(&'static str, NotificationPriority),
    /// Read a message aloud.
    ReadMessage(&'static str),
    /// Read the available commands aloud.
    AnnounceHelp,
    /// Turn voice navigation off.
    StopListening,
}

/// One entry of the default command set.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavigationCommand {
    pub phrase: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    #[serde(skip)]
    pub action: NavigationAction,
}

/// The default command set, in match order.
pub const DEFAULT_COMMANDS: &[NavigationCommand] = &[
    NavigationCommand {
        phrase: "go home",
        aliases: &["home", "dashboard"],
        description: "open the home screen",
        action: NavigationAction::Navigate("/home"),
    },
    NavigationCommand {
        phrase: "medications",
        aliases: &["my medications", "pills", "medicine"],
        description: "see your medication schedule",
        action: NavigationAction::Navigate("/medications"),
    },
    NavigationCommand {
        phrase: "emergency",
        aliases: &["help", "call for help"],
        description: "alert your caregiver",
        action: NavigationAction::Notify(
            "Calling for help. Your caregiver has been notified.",
            NotificationPriority::Critical,
        ),
    },
    NavigationCommand {
        phrase: "messages",
        aliases: &["read messages", "my messages"],
        description: "hear your messages",
        action: NavigationAction::ReadMessage("You have no new messages."),
    },
    NavigationCommand {
        phrase: "show health",
        aliases: &["health", "my health", "vitals"],
        description: "open your health readings",
        action: NavigationAction::Navigate("/health"),
    },
    NavigationCommand {
        phrase: "settings",
        aliases: &["preferences"],
        description: "open settings",
        action: NavigationAction::Navigate("/settings"),
    },
    NavigationCommand {
        phrase: "what can i say",
        aliases: &["voice commands", "list commands"],
        description: "hear the list of commands",
        action: NavigationAction::AnnounceHelp,
    },
    NavigationCommand {
        phrase: "stop listening",
        aliases: &["stop voice"],
        description: "turn voice navigation off",
        action: NavigationAction::StopListening,
    },
];

impl NavigationAction {
    /// Session request this action sends, if any.
    pub fn session_command(self) -> Option<SessionCommand> {
        match self {
            Self::Navigate(_) => None,
            Self::Notify(text, priority) => Some(SessionCommand::Notify {
                text: text.to_string(),
                priority,
            }),
            Self::ReadMessage(text) => Some(SessionCommand::ReadMessage(text.to_string())),
            Self::AnnounceHelp => Some(SessionCommand::AnnounceHelp),
            Self::StopListening => Some(SessionCommand::StopListening),
        }
    }
}

impl NavigationCommand {
    /// Build the voice command, sending session requests through `inputs`.
    pub fn to_voice_command(&self, inputs: &UnboundedSender<SessionInput>) -> VoiceCommand {
        let action = self.action;
        let inputs = inputs.clone();
        VoiceCommand::new(self.phrase, self.description, move || {
            if let NavigationAction::Navigate(route) = action {
                println!("-> {route}");
            }
            if let Some(command) = action.session_command() {
                if inputs.send(command.into()).is_err() {
                    tracing::debug!("Session gone, dropping command request");
                }
            }
        })
        .aliases(self.aliases.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carevoice_voice::CommandRegistry;
    use tokio::sync::mpsc;

    fn registry(inputs: &UnboundedSender<SessionInput>) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for command in DEFAULT_COMMANDS {
            assert!(registry.register(command.to_voice_command(inputs)));
        }
        registry
    }

    #[test]
    fn test_default_keys_are_unique() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let registry = registry(&tx);
        assert_eq!(registry.len(), DEFAULT_COMMANDS.len());
    }

    #[test]
    fn test_emergency_alias_sends_critical_notification() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let registry = registry(&tx);

        assert_eq!(registry.dispatch("help").unwrap(), "emergency");
        match rx.try_recv().unwrap() {
            SessionInput::Command(SessionCommand::Notify { priority, .. }) => {
                assert_eq!(priority, NotificationPriority::Critical);
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn test_spoken_variants_resolve() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let registry = registry(&tx);

        let cases = [
            ("Dashboard", "go home"),
            ("did I take my pills", "medications"),
            ("read messages", "messages"),
            ("vitals", "show health"),
            ("What can I say", "what can i say"),
            ("stop voice", "stop listening"),
        ];
        for (spoken, expected) in cases {
            assert_eq!(
                registry.resolve(spoken).map(|c| c.phrase.as_str()),
                Some(expected),
                "{spoken}"
            );
        }
    }

    #[test]
    fn test_navigation_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let registry = registry(&tx);

        registry.dispatch("settings").unwrap();
        assert!(rx.try_recv().is_err());
    }
}
