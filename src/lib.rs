//! An embeddable interactive console.
//!
//! A host program registers commands, each described by a [`CommandSignature`]
//! (name or aliases, required positional arguments, optional named arguments),
//! and hands control to a [`Shell`]. The shell reads lines, splits them into
//! tokens while respecting double-quoted spans, separates `--name value`
//! pairs from positional arguments, checks the positional count against the
//! signature and calls the command's handler.
//!
//! Malformed input never ends the session: each failure is reported as a
//! single diagnostic line and the next line is read.
//!
//! The stages are exposed individually in [`lexer`], [`parser`] and
//! [`binder`]; [`coerce::convert_type`] turns a token into a typed [`Value`]
//! for handlers that want one.

pub mod binder;
mod builtin;
pub mod coerce;
pub mod command;
pub mod config;
pub mod error;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod registry;

pub use coerce::{Value, convert_type};
pub use command::{
    ArgumentSpec, BoundArgs, BoundValue, CommandHandler, CommandName, CommandSignature, Invocation,
};
pub use config::ShellConfig;
pub use error::{DispatchError, RegistryError, ShapeError};
/// Just a convenient re-export of the interactive console.
///
/// See [`Shell`] for the high-level API and examples.
pub use interpreter::{LoopControl, Shell};
