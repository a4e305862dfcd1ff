//! Voice command definitions.

use std::fmt;
use std::sync::Arc;

/// Callback run when a command is recognized.
///
/// The registry only holds a shared handle to the callback; whatever state
/// the callback touches stays owned by the component that registered it.
pub type CommandAction = Arc<dyn Fn() + Send + Sync>;

/// Normalise a phrase or transcript for matching: trimmed and lower-cased.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// A spoken command: a primary phrase, optional aliases and the action to run.
#[derive(Clone)]
pub struct VoiceCommand {
    /// Canonical phrase, reported back when any of the command's keys match.
    pub phrase: String,

    /// Alternate phrases resolving to the same command, in registration order.
    pub aliases: Vec<String>,

    /// Human-readable description, used for spoken help.
    pub description: String,

    action: CommandAction,
}

impl VoiceCommand {
    /// Create a command with no aliases.
    pub fn new(
        phrase: impl Into<String>,
        description: impl Into<String>,
        action: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            aliases: Vec::new(),
            description: description.into(),
            action: Arc::new(action),
        }
    }

    /// Create a command from an already shared action handle.
    pub fn with_action(
        phrase: impl Into<String>,
        description: impl Into<String>,
        action: CommandAction,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            aliases: Vec::new(),
            description: description.into(),
            action,
        }
    }

    /// Add one alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add several aliases, keeping their order.
    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Run the command's action.
    pub fn run(&self) {
        (self.action)();
    }

    /// Normalised registry keys: the primary phrase first, then each alias.
    ///
    /// Blank keys and duplicates are skipped.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.aliases.len() + 1);
        for raw in std::iter::once(&self.phrase).chain(self.aliases.iter()) {
            let key = normalize_phrase(raw);
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

impl fmt::Debug for VoiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceCommand")
            .field("phrase", &self.phrase)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
