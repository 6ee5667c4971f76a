use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;
use std::io::{Result as IoResult, Write};

/// Source of input lines for the read loop.
pub trait LineSource {
    /// Reads the next line after showing `prompt`.
    ///
    /// Returns `Ok(None)` when the input is exhausted or the user interrupted it.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Pre-recorded lines, replayed in order. Useful for tests and scripted sessions.
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Memory-backed writer for capturing shell output.
pub struct MemWriter {
    buf: Vec<u8>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
