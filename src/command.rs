use crate::error::{RegistryError, ShapeError};
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s").expect("whitespace pattern is valid"));

/// Name under which a command is invoked: one identifier or a set of aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    Single(String),
    Aliases(Vec<String>),
}

impl CommandName {
    /// All identifiers this command answers to.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            CommandName::Single(name) => std::slice::from_ref(name),
            CommandName::Aliases(names) => names.as_slice(),
        };
        slice.iter().map(String::as_str)
    }

    /// Rejects empty alias sets and names that are empty or contain whitespace.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if let CommandName::Aliases(names) = self {
            if names.is_empty() {
                return Err(RegistryError::InvalidName(String::new()));
            }
        }
        match self
            .names()
            .find(|name| name.is_empty() || WHITESPACE.is_match(name))
        {
            Some(bad) => Err(RegistryError::InvalidName(bad.to_string())),
            None => Ok(()),
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        write!(f, "{}", names.join(", "))
    }
}

impl From<&str> for CommandName {
    fn from(name: &str) -> Self {
        CommandName::Single(name.to_string())
    }
}

impl From<String> for CommandName {
    fn from(name: String) -> Self {
        CommandName::Single(name)
    }
}

impl From<Vec<String>> for CommandName {
    fn from(names: Vec<String>) -> Self {
        CommandName::Aliases(names)
    }
}

impl<const N: usize> From<[&str; N]> for CommandName {
    fn from(names: [&str; N]) -> Self {
        CommandName::Aliases(names.iter().map(|s| s.to_string()).collect())
    }
}

/// A declared command parameter, used for arity and help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub description: Option<String>,
    pub is_optional: bool,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_optional: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Descriptor of a registered command.
///
/// Built once by the host program and owned by the registry afterwards. The
/// only way to change it later is through the [`Invocation`] handed to the
/// command's own handler.
#[derive(Debug, Clone)]
pub struct CommandSignature {
    name: CommandName,
    description: Option<String>,
    required_args: Vec<ArgumentSpec>,
    optional_args: Vec<ArgumentSpec>,
    captures_overflow: bool,
    show_arg_help_when_empty: bool,
}

impl CommandSignature {
    /// Creates a signature without arguments.
    ///
    /// Fails with [`RegistryError::InvalidName`] if a name is empty or
    /// contains whitespace.
    pub fn new(name: impl Into<CommandName>) -> Result<Self, RegistryError> {
        let name = name.into();
        name.validate()?;
        Ok(Self {
            name,
            description: None,
            required_args: Vec::new(),
            optional_args: Vec::new(),
            captures_overflow: false,
            show_arg_help_when_empty: true,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a required positional argument.
    pub fn with_required(mut self, mut arg: ArgumentSpec) -> Self {
        arg.is_optional = false;
        self.required_args.push(arg);
        self
    }

    /// Appends an optional named argument.
    pub fn with_optional(mut self, mut arg: ArgumentSpec) -> Self {
        arg.is_optional = true;
        self.optional_args.push(arg);
        self
    }

    /// Collect positional tokens beyond the required ones into a trailing group.
    pub fn capture_overflow(mut self, enabled: bool) -> Self {
        self.captures_overflow = enabled;
        self
    }

    /// Whether help mentions missing required/optional arguments.
    pub fn show_arg_help_when_empty(mut self, enabled: bool) -> Self {
        self.show_arg_help_when_empty = enabled;
        self
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn required_args(&self) -> &[ArgumentSpec] {
        &self.required_args
    }

    pub fn optional_args(&self) -> &[ArgumentSpec] {
        &self.optional_args
    }

    pub fn captures_overflow(&self) -> bool {
        self.captures_overflow
    }

    pub fn shows_arg_help_when_empty(&self) -> bool {
        self.show_arg_help_when_empty
    }
}

/// One bound positional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Token(String),
    /// Positional tokens past the required ones, kept in input order.
    Overflow(Vec<String>),
}

/// Arguments handed to a handler after binding.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoundArgs {
    values: Vec<BoundValue>,
    named: HashMap<String, String>,
}

impl BoundArgs {
    pub fn new(values: Vec<BoundValue>, named: HashMap<String, String>) -> Self {
        Self { values, named }
    }

    pub fn values(&self) -> &[BoundValue] {
        &self.values
    }

    pub fn named(&self) -> &HashMap<String, String> {
        &self.named
    }

    /// Number of positional values, counting an overflow group as one.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.named.is_empty()
    }

    /// The positional token at `index`.
    pub fn arg(&self, index: usize) -> Result<&str, ShapeError> {
        match self.values.get(index) {
            Some(BoundValue::Token(token)) => Ok(token),
            _ => Err(ShapeError::MissingPositional(index)),
        }
    }

    /// The trailing overflow group.
    pub fn overflow(&self) -> Result<&[String], ShapeError> {
        match self.values.last() {
            Some(BoundValue::Overflow(rest)) => Ok(rest),
            _ => Err(ShapeError::MissingOverflow),
        }
    }

    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Fails on the first named argument outside of `accepted`.
    pub fn accept_named(&self, accepted: &[&str]) -> Result<(), ShapeError> {
        let mut names: Vec<&String> = self.named.keys().collect();
        names.sort();
        match names.into_iter().find(|name| !accepted.contains(&name.as_str())) {
            Some(unknown) => Err(ShapeError::UnknownNamed(unknown.clone())),
            None => Ok(()),
        }
    }
}

/// Everything a handler gets for one call.
///
/// Besides the arguments and the output stream, the invocation exposes the
/// command's own descriptor. A handler may rewrite its description or swap
/// in another handler for subsequent calls; nothing else in the registry is
/// reachable from here.
pub struct Invocation<'a> {
    args: BoundArgs,
    out: &'a mut dyn Write,
    signature: &'a mut CommandSignature,
    replacement: &'a mut Option<Box<dyn CommandHandler>>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        args: BoundArgs,
        out: &'a mut dyn Write,
        signature: &'a mut CommandSignature,
        replacement: &'a mut Option<Box<dyn CommandHandler>>,
    ) -> Self {
        Self {
            args,
            out,
            signature,
            replacement,
        }
    }

    pub fn args(&self) -> &BoundArgs {
        &self.args
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub fn signature(&self) -> &CommandSignature {
        &*self.signature
    }

    pub fn signature_mut(&mut self) -> &mut CommandSignature {
        &mut *self.signature
    }

    /// Replaces this command's handler once the current call returns.
    pub fn replace_handler(&mut self, handler: impl CommandHandler + 'static) {
        *self.replacement = Some(Box::new(handler));
    }
}

/// Code run when a command is dispatched.
///
/// Implemented for any `FnMut(&mut Invocation) -> anyhow::Result<()>`.
/// Returning a [`ShapeError`] reports an argument shape mismatch to the user.
pub trait CommandHandler {
    fn call(&mut self, invocation: &mut Invocation<'_>) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: FnMut(&mut Invocation<'_>) -> Result<()>,
{
    fn call(&mut self, invocation: &mut Invocation<'_>) -> Result<()> {
        self(invocation)
    }
}
