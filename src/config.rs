/// Options of a [`Shell`](crate::Shell) instance.
///
/// Fields are public and every one has a default, so hosts typically write
/// `ShellConfig { prompt: "$".into(), ..Default::default() }`.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Printed (followed by a space) before every input line.
    pub prompt: String,
    /// Match command names case-insensitively.
    pub lowercase_commands: bool,
    /// Lines that shut the shell down.
    ///
    /// Matching ignores case on both sides: the trimmed input line and every
    /// alias are lowercased before comparing, so an alias configured as `Bye`
    /// is closed by `bye`, `BYE` or `Bye`.
    pub exit_aliases: Vec<String>,
    /// Skip the warning for commands that take no arguments but got some.
    pub ignore_minor_errors: bool,
    /// Prefix of named arguments; an empty prefix disables them.
    pub optional_args_prefix: String,
    /// Printed when the shell shuts down, if any.
    pub end_message: Option<String>,
    /// Print nothing instead of "No description provided." in help.
    pub help_ignore_no_description: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: ">>>".to_string(),
            lowercase_commands: false,
            exit_aliases: vec!["exit".to_string(), "end".to_string(), "quit".to_string()],
            ignore_minor_errors: false,
            optional_args_prefix: "--".to_string(),
            end_message: Some("Console closed.".to_string()),
            help_ignore_no_description: false,
        }
    }
}

impl ShellConfig {
    /// Whether `line` asks the shell to shut down.
    pub fn is_exit_alias(&self, line: &str) -> bool {
        let line = line.trim().to_lowercase();
        self.exit_aliases
            .iter()
            .any(|alias| alias.to_lowercase() == line)
    }
}
