//! Command registry mapping spoken phrases and their aliases to actions.
//!
//! Every command is stored once and referenced from each of its normalised
//! keys. Keys keep registration order, which is the order substring matching
//! walks them in.

use std::collections::HashMap;

use carevoice_core::{VoiceCommand, normalize_phrase};
use indexmap::IndexMap;

use crate::error::DispatchError;

/// Spoken when no commands are registered and help is requested.
pub const NO_COMMANDS_HELP: &str = "No voice commands are available right now.";

type CommandId = u64;

/// Registered voice commands, keyed by phrase and alias.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    keys: IndexMap<String, CommandId>,
    commands: HashMap<CommandId, VoiceCommand>,
    next_id: CommandId,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its phrase and every alias.
    ///
    /// A key that is already bound moves to the new command and keeps its
    /// position in match order. A previous command left without keys is
    /// dropped. Returns `false` when the command has no usable key.
    pub fn register(&mut self, command: VoiceCommand) -> bool {
        let keys = command.keys();
        if keys.is_empty() {
            tracing::warn!(phrase = %command.phrase, "Ignoring voice command without a phrase");
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut displaced = Vec::new();
        for key in keys {
            if let Some(previous) = self.keys.insert(key.clone(), id) {
                tracing::debug!(key = %key, "Rebinding voice command key");
                displaced.push(previous);
            }
        }
        for previous in displaced {
            if !self.keys.values().any(|owner| *owner == previous) {
                self.commands.remove(&previous);
            }
        }

        tracing::debug!(
            phrase = %command.phrase,
            aliases = command.aliases.len(),
            "Registered voice command"
        );
        self.commands.insert(id, command);
        true
    }

    /// Remove the command owning `phrase_or_alias`, together with all of its
    /// keys. Returns whether anything was removed.
    pub fn unregister(&mut self, phrase_or_alias: &str) -> bool {
        let key = normalize_phrase(phrase_or_alias);
        let Some(&id) = self.keys.get(&key) else {
            return false;
        };

        self.keys.retain(|_, owner| *owner != id);
        if let Some(command) = self.commands.remove(&id) {
            tracing::debug!(phrase = %command.phrase, "Unregistered voice command");
        }
        true
    }

    /// Find the command a transcript refers to.
    ///
    /// An exact key wins. Otherwise the first key, in registration order,
    /// that contains the transcript or is contained in it.
    pub fn resolve(&self, transcript: &str) -> Option<&VoiceCommand> {
        let spoken = normalize_phrase(transcript);
        if spoken.is_empty() {
            return None;
        }

        let id = self.keys.get(&spoken).or_else(|| {
            self.keys
                .iter()
                .find(|(key, _)| spoken.contains(key.as_str()) || key.contains(spoken.as_str()))
                .map(|(_, id)| id)
        })?;
        self.commands.get(id)
    }

    /// Resolve a transcript and run the matching command's action.
    ///
    /// Returns the command's primary phrase, even when an alias matched.
    pub fn dispatch(&self, transcript: &str) -> Result<String, DispatchError> {
        let Some(command) = self.resolve(transcript) else {
            tracing::debug!(transcript = %transcript, "No voice command matched");
            return Err(DispatchError::NotRecognized(transcript.to_string()));
        };

        tracing::info!(command = %command.phrase, transcript = %transcript, "Voice command matched");
        command.run();
        Ok(command.phrase.clone())
    }

    /// Distinct registered commands in first-registration order.
    pub fn commands(&self) -> Vec<&VoiceCommand> {
        let mut seen = Vec::with_capacity(self.commands.len());
        for id in self.keys.values() {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen.iter().filter_map(|id| self.commands.get(id)).collect()
    }

    /// Whether `phrase_or_alias` is bound to a command.
    pub fn contains(&self, phrase_or_alias: &str) -> bool {
        self.keys.contains_key(&normalize_phrase(phrase_or_alias))
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.commands.clear();
    }

    /// Spoken summary of the available commands.
    pub fn help_text(&self) -> String {
        let commands = self.commands();
        if commands.is_empty() {
            return NO_COMMANDS_HELP.to_string();
        }

        let entries: Vec<String> = commands
            .iter()
            .map(|command| {
                let description = command.description.trim();
                if description.is_empty() {
                    command.phrase.clone()
                } else {
                    format!("{} to {}", command.phrase, description)
                }
            })
            .collect();
        format!("You can say: {}.", entries.join("; "))
    }
}
