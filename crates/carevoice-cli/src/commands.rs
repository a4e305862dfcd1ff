//! Available subcommands.

use carevoice_core::NotificationPriority;
use clap::{Subcommand, ValueEnum};

/// Available commands for the carevoice tool.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for spoken commands typed on stdin
    Listen {
        /// Stop after the first recognized phrase instead of listening continuously
        #[arg(long)]
        once: bool,

        /// Do not speak "<command> activated" after each command
        #[arg(long)]
        quiet: bool,
    },

    /// Speak one message
    Say {
        /// Text to speak
        text: String,

        /// Kind of message, which selects the speaking style
        #[arg(short, long, value_enum, default_value_t = SayStyle::Notification)]
        style: SayStyle,

        /// Notification urgency: critical, high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: NotificationPriority,
    },

    /// List the voice commands understood by `listen`
    Commands {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available voices and the one used for the locale
    Voices,
}

/// Speaking style for `say`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SayStyle {
    /// Notification prosody chosen by `--priority`
    Notification,
    /// Slow, for step-by-step guidance
    Instruction,
    /// Conversational, for reading messages
    Message,
    /// Slower and lower, for errors
    Error,
}
