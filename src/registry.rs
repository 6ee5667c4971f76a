//! Command registry.
//!
//! A flat, append-only table of commands. Entries keep their registration
//! order (help lists them that way) and are addressed by index, which stays
//! stable for the lifetime of the shell.

use crate::command::{CommandHandler, CommandSignature};
use crate::error::RegistryError;
use log::debug;

/// What runs when a registered command is dispatched.
pub(crate) enum Target {
    /// The shell's own help listing.
    Help,
    Handler(Box<dyn CommandHandler>),
}

pub(crate) struct RegisteredCommand {
    pub(crate) signature: CommandSignature,
    pub(crate) target: Target,
}

/// Table of registered commands.
pub struct CommandRegistry {
    entries: Vec<RegisteredCommand>,
    fold_case: bool,
    frozen: bool,
}

impl CommandRegistry {
    /// Creates an empty registry. With `fold_case`, names are matched in lowercase.
    pub fn new(fold_case: bool) -> Self {
        Self {
            entries: Vec::new(),
            fold_case,
            frozen: false,
        }
    }

    /// Registers `handler` under every name of `signature`.
    pub fn register(
        &mut self,
        signature: CommandSignature,
        handler: impl CommandHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.insert(signature, Target::Handler(Box::new(handler)))
    }

    pub(crate) fn insert(
        &mut self,
        signature: CommandSignature,
        target: Target,
    ) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::FrozenRegistry);
        }
        signature.name().validate()?;

        let mut seen: Vec<String> = Vec::new();
        for name in signature.name().names() {
            let folded = self.fold(name);
            if self.position(&folded).is_some() || seen.contains(&folded) {
                return Err(RegistryError::DuplicateCommand(name.to_string()));
            }
            seen.push(folded);
        }

        debug!("registered command '{}'", signature.name());
        self.entries.push(RegisteredCommand { signature, target });
        Ok(())
    }

    /// Finds the signature registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&CommandSignature> {
        self.position(&self.fold(name))
            .map(|index| &self.entries[index].signature)
    }

    /// Index of the entry registered under `name`.
    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.position(&self.fold(name))
    }

    pub(crate) fn entry(&self, index: usize) -> &RegisteredCommand {
        &self.entries[index]
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut RegisteredCommand {
        &mut self.entries[index]
    }

    /// Signatures in registration order.
    pub fn signatures(&self) -> impl Iterator<Item = &CommandSignature> {
        self.entries.iter().map(|entry| &entry.signature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refuses any further registration.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn fold(&self, name: &str) -> String {
        if self.fold_case {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    // `folded` is already folded; registered names are folded on the fly.
    fn position(&self, folded: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry
                .signature
                .name()
                .names()
                .any(|name| self.fold(name) == folded)
        })
    }
}
