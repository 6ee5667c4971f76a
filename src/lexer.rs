//! Line tokenizer.
//!
//! A line is split on whitespace into fragments. A fragment starting with a
//! double quote opens a quoted span that absorbs the following fragments,
//! joined with single spaces, up to the first fragment ending with a double
//! quote. The merged span becomes a single token with the outer quotes removed.

use crate::error::DispatchError;

/// A single token of an input line.
///
/// Quoted tokens already have their surrounding quotes stripped and remember
/// that they were quoted, so later stages never unescape them twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    text: String,
    quoted: bool,
}

impl RawToken {
    /// A token taken verbatim from the line.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    /// A token produced by merging a quoted span.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether this token still has to go through quote merging.
    pub(crate) fn opens_quote(&self) -> bool {
        !self.quoted && self.text.starts_with('"')
    }
}

impl From<&str> for RawToken {
    fn from(text: &str) -> Self {
        RawToken::new(text)
    }
}

impl AsRef<str> for RawToken {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingQuote,
}

struct LexingFSM {
    state: LexingState,
    buffer: String,
}

impl LexingFSM {
    fn new() -> Self {
        LexingFSM {
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    /// Feeds one whitespace-free fragment, returning a token once one is complete.
    fn feed(&mut self, fragment: &str) -> Option<RawToken> {
        match self.state {
            LexingState::Start => self.handle_start(fragment),
            LexingState::ReadingQuote => self.handle_quote(fragment),
        }
    }

    fn handle_start(&mut self, fragment: &str) -> Option<RawToken> {
        if !fragment.starts_with('"') {
            return Some(RawToken::new(fragment));
        }
        if fragment.len() >= 2 && fragment.ends_with('"') {
            return Some(RawToken::quoted(strip_quotes(fragment)));
        }
        self.buffer.push_str(fragment);
        self.state = LexingState::ReadingQuote;
        None
    }

    fn handle_quote(&mut self, fragment: &str) -> Option<RawToken> {
        self.buffer.push(' ');
        self.buffer.push_str(fragment);
        if !fragment.ends_with('"') {
            return None;
        }
        self.state = LexingState::Start;
        let merged = std::mem::take(&mut self.buffer);
        Some(RawToken::quoted(strip_quotes(&merged)))
    }

    fn finish(self) -> Result<(), DispatchError> {
        match self.state {
            LexingState::Start => Ok(()),
            LexingState::ReadingQuote => Err(DispatchError::UnterminatedQuote),
        }
    }
}

// Both ends are an ASCII '"', so byte slicing stays on char boundaries.
fn strip_quotes(span: &str) -> &str {
    &span[1..span.len() - 1]
}

/// Splits an argument line into tokens, merging double-quoted spans.
///
/// Fails with [`DispatchError::UnterminatedQuote`] when a quoted span is still
/// open at the end of the line; no tokens are returned in that case.
///
/// ```
/// use shell_console::lexer::split_into_tokens;
/// let tokens = split_into_tokens(r#"arg1 "hello world" arg2"#).unwrap();
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
/// assert_eq!(texts, ["arg1", "hello world", "arg2"]);
/// ```
pub fn split_into_tokens(line: &str) -> Result<Vec<RawToken>, DispatchError> {
    let mut lexer = LexingFSM::new();
    let mut out = Vec::new();
    for fragment in line.split_whitespace() {
        if let Some(token) = lexer.feed(fragment) {
            out.push(token);
        }
    }
    lexer.finish()?;
    Ok(out)
}

/// Merges the quoted span that starts at `items[start]`.
///
/// Returns the merged token and how many items it spans.
pub(crate) fn merge_quoted<S: AsRef<str>>(
    items: &[S],
    start: usize,
) -> Result<(RawToken, usize), DispatchError> {
    let mut lexer = LexingFSM::new();
    for (offset, item) in items[start..].iter().enumerate() {
        if let Some(token) = lexer.feed(item.as_ref()) {
            return Ok((token, offset + 1));
        }
    }
    Err(DispatchError::UnterminatedQuote)
}

/// Splits a trimmed line into its command word and the remaining argument text.
pub fn split_command_word(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((line, "")),
    }
}
