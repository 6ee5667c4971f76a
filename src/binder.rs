//! Binding of classified tokens to a command signature.

use crate::command::{BoundArgs, BoundValue, CommandSignature};
use crate::error::DispatchError;
use crate::lexer::RawToken;
use crate::parser::ClassifiedInput;
use log::debug;
use std::collections::HashMap;

/// How a signature receives its arguments, decided once from its declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStrategy {
    /// Neither required nor optional arguments: arguments are ignored.
    NoArgs,
    /// Required arguments only: named values are dropped.
    PositionalOnly,
    /// Optional arguments only.
    NamedOnly,
    /// Both required and optional arguments.
    Full,
}

impl BindingStrategy {
    pub fn for_signature(signature: &CommandSignature) -> Self {
        let required = !signature.required_args().is_empty();
        let optional = !signature.optional_args().is_empty();
        match (required, optional) {
            (false, false) => BindingStrategy::NoArgs,
            (true, false) => BindingStrategy::PositionalOnly,
            (false, true) => BindingStrategy::NamedOnly,
            (true, true) => BindingStrategy::Full,
        }
    }
}

/// Validates positional arity and builds the handler's arguments.
///
/// Named values are passed through without checking them against the
/// declared optional arguments; handlers that care call
/// [`BoundArgs::accept_named`].
pub fn bind(
    signature: &CommandSignature,
    input: ClassifiedInput,
) -> Result<BoundArgs, DispatchError> {
    let strategy = BindingStrategy::for_signature(signature);
    debug!("binding '{}' with {:?}", signature.name(), strategy);

    let named: HashMap<String, String> = input
        .named
        .into_iter()
        .map(|(name, value)| (name, value.into_text()))
        .collect();

    match strategy {
        BindingStrategy::NoArgs => Ok(BoundArgs::default()),
        BindingStrategy::PositionalOnly => {
            if !named.is_empty() {
                debug!("dropping {} named arguments", named.len());
            }
            let values = bind_positional(signature, input.positional)?;
            Ok(BoundArgs::new(values, HashMap::new()))
        }
        BindingStrategy::NamedOnly | BindingStrategy::Full => {
            let values = bind_positional(signature, input.positional)?;
            Ok(BoundArgs::new(values, named))
        }
    }
}

fn bind_positional(
    signature: &CommandSignature,
    positional: Vec<RawToken>,
) -> Result<Vec<BoundValue>, DispatchError> {
    let expected = signature.required_args().len();
    let given = positional.len();

    if given < expected || (given > expected && !signature.captures_overflow()) {
        return Err(DispatchError::ArityMismatch { expected, given });
    }

    let mut tokens = positional.into_iter().map(|t| t.into_text());
    let mut values: Vec<BoundValue> = tokens
        .by_ref()
        .take(expected)
        .map(BoundValue::Token)
        .collect();
    if given > expected {
        values.push(BoundValue::Overflow(tokens.collect()));
    }
    Ok(values)
}
