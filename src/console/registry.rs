//! Ordered name → handler table backing the console.
//!
//! Entries keep registration order so help and error output list commands the
//! way they were declared. Validation happens in [`CommandRegistry::register`],
//! which means a broken table fails when it is built rather than when an
//! operator first asks for help.

use thiserror::Error;

use super::command::{Command, BUILTIN_COMMANDS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),
    #[error("command '{0}' has no description; help text is generated from it")]
    MissingDescription(String),
    #[error("invalid command name {0:?}: must be non-empty, lowercase and free of whitespace")]
    InvalidName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown command '{0}'")]
    CommandNotFound(String),
}

#[derive(Debug, Clone)]
pub struct CommandEntry<H> {
    pub name: String,
    pub description: String,
    pub handler: H,
}

#[derive(Debug, Clone)]
pub struct CommandRegistry<H> {
    entries: Vec<CommandEntry<H>>,
}

impl<H> Default for CommandRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> CommandRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: H,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        let description = description.into();
        if name.is_empty()
            || name.chars().any(char::is_whitespace)
            || name.to_lowercase() != name
        {
            return Err(RegistrationError::InvalidName(name));
        }
        if self.contains(&name) {
            return Err(RegistrationError::DuplicateCommand(name));
        }
        if description.trim().is_empty() {
            return Err(RegistrationError::MissingDescription(name));
        }
        self.entries.push(CommandEntry {
            name,
            description,
            handler,
        });
        Ok(())
    }

    /// Exact-match lookup; callers normalize the key first.
    pub fn lookup(&self, name: &str) -> Result<&H, LookupError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.handler)
            .ok_or_else(|| LookupError::CommandNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// `(name, description)` pairs in registration order. Each call starts over.
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.description.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CommandRegistry<Command> {
    /// The fixed console table.
    pub fn builtin() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for (name, command) in BUILTIN_COMMANDS {
            registry.register(*name, command.description(), *command)?;
        }
        Ok(registry)
    }
}
