//! Error taxonomies of the console.
//!
//! [`DispatchError`] covers everything that can go wrong while handling one
//! input line. All of its variants are recoverable: the shell prints the
//! `Display` text as a single diagnostic line and reads the next line.
//! [`RegistryError`] covers command setup mistakes made by the host program.

use thiserror::Error;

/// Failure of a single dispatch cycle.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A token opened a double-quoted span that was never closed.
    #[error("The string never ends.")]
    UnterminatedQuote,

    /// A named argument prefix was the last token on the line.
    #[error("No value has been given for the argument '{name}'")]
    MissingArgumentValue { name: String },

    /// No registered command or alias matches the command word.
    #[error("Command not found. Type 'help' for the list of available commands.")]
    CommandNotFound { name: String },

    /// The positional count does not match the declared required arguments.
    #[error("This function requires {expected} arguments, got {given}.")]
    ArityMismatch { expected: usize, given: usize },

    /// The handler rejected the shape of the arguments it was given.
    #[error("{}", handler_arity_message(.expected, .given))]
    HandlerArity { expected: Option<usize>, given: usize },

    /// The handler itself failed for a reason unrelated to its arguments.
    #[error("Error: {0:#}")]
    HandlerFailed(anyhow::Error),
}

fn handler_arity_message(expected: &Option<usize>, given: &usize) -> String {
    match *expected {
        Some(n) => format!(
            "This function requires {n} arguments, got {given}. \
             It might also come from an unknown named argument, see 'help'."
        ),
        None => format!("This function requires no arguments, got {given}."),
    }
}

/// Failure while registering a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command '{0}' already exists")]
    DuplicateCommand(String),

    #[error("Console is already launched, cannot add any more commands.")]
    FrozenRegistry,

    #[error("Command name {0:?} should not be empty or contain whitespace.")]
    InvalidName(String),
}

/// Raised by handlers when the bound arguments do not fit what they accept.
///
/// Returning this (directly or through `anyhow`) from a handler makes the
/// dispatcher report [`DispatchError::HandlerArity`] instead of a generic
/// failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("missing positional argument #{0}")]
    MissingPositional(usize),

    #[error("no overflow arguments were captured")]
    MissingOverflow,

    #[error("unexpected named argument '{0}'")]
    UnknownNamed(String),
}
