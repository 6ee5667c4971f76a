//! Argument classification.
//!
//! Walks the token sequence once, left to right, and separates named
//! arguments (`--name value`) from positional ones.

use crate::error::DispatchError;
use crate::lexer::{self, RawToken};
use log::debug;
use std::collections::HashMap;

/// Tokens of one line, split into positional and named arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifiedInput {
    /// Positional tokens, in their original relative order.
    pub positional: Vec<RawToken>,
    /// Named argument identifier to its value. Later occurrences overwrite earlier ones.
    pub named: HashMap<String, RawToken>,
}

impl ClassifiedInput {
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

struct ArgumentClassifier<'p> {
    tokens: Vec<RawToken>,
    pos: usize,
    prefix: &'p str,
}

impl<'p> ArgumentClassifier<'p> {
    fn new(tokens: Vec<RawToken>, prefix: &'p str) -> Self {
        ArgumentClassifier {
            tokens,
            pos: 0,
            prefix,
        }
    }

    fn build(mut self) -> Result<ClassifiedInput, DispatchError> {
        let mut out = ClassifiedInput::default();

        while let Some(token) = self.peek() {
            if token.opens_quote() {
                let merged = self.consume_merged()?;
                out.positional.push(merged);
                continue;
            }

            let Some(name) = self.named_identifier(token) else {
                out.positional.push(self.tokens[self.pos].clone());
                self.pos += 1;
                continue;
            };

            let name = name.to_string();
            self.pos += 1; // the prefixed token

            if self.peek().is_none() {
                return Err(DispatchError::MissingArgumentValue { name });
            }
            let value = self.consume_merged()?;
            if out.named.insert(name.clone(), value).is_some() {
                debug!("named argument '{name}' repeated, keeping the last value");
            }
        }

        Ok(out)
    }

    fn peek(&self) -> Option<&RawToken> {
        self.tokens.get(self.pos)
    }

    /// Identifier of a named argument token, if the token carries the prefix.
    fn named_identifier<'t>(&self, token: &'t RawToken) -> Option<&'t str> {
        if self.prefix.is_empty() || token.is_quoted() {
            return None;
        }
        token.text().strip_prefix(self.prefix)
    }

    /// Consumes the token at the cursor, merging it with the following ones
    /// when it opens a quoted span.
    fn consume_merged(&mut self) -> Result<RawToken, DispatchError> {
        if !self.tokens[self.pos].opens_quote() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            return Ok(token);
        }
        let (merged, used) = lexer::merge_quoted(&self.tokens, self.pos)?;
        self.pos += used;
        Ok(merged)
    }
}

/// Separates named arguments introduced by `prefix` from positional tokens.
///
/// The token right after a prefixed token is its value, whatever it looks
/// like. An empty `prefix` disables named arguments altogether.
pub fn classify(tokens: Vec<RawToken>, prefix: &str) -> Result<ClassifiedInput, DispatchError> {
    let classified = ArgumentClassifier::new(tokens, prefix).build()?;
    debug!(
        "classified {} positional and {} named arguments",
        classified.positional.len(),
        classified.named.len()
    );
    Ok(classified)
}
