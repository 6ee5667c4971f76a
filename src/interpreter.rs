use crate::binder::{self, BindingStrategy};
use crate::builtin;
use crate::command::{BoundArgs, CommandHandler, CommandSignature, Invocation};
use crate::config::ShellConfig;
use crate::error::{DispatchError, RegistryError, ShapeError};
use crate::io_adapters::LineSource;
use crate::lexer;
use crate::parser;
use crate::registry::{CommandRegistry, Target};
use log::{debug, error, info, warn};
use rustyline::DefaultEditor;
use std::io::Write;

/// What the read loop does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// An interactive console dispatching input lines to registered commands.
///
/// Commands are registered before [`launch`](Shell::launch) (or
/// [`run`](Shell::run)); once the loop starts the registry is frozen. Every
/// line goes through one dispatch cycle: tokenize, classify, bind, invoke.
/// Any failure along the way prints one diagnostic line and the loop carries
/// on with the next line.
///
/// Example
/// ```
/// use shell_console::{CommandSignature, ArgumentSpec, Shell, ShellConfig};
/// use shell_console::io_adapters::{MemWriter, ScriptedInput};
/// use std::io::Write;
///
/// let mut sh = Shell::new(ShellConfig::default());
/// sh.add(
///     CommandSignature::new("greet").unwrap().with_required(ArgumentSpec::new("who")),
///     |inv| {
///         let who = inv.args().arg(0)?.to_string();
///         writeln!(inv.out(), "Hello, {who}!")?;
///         Ok(())
///     },
/// )
/// .unwrap();
///
/// let mut out = MemWriter::new();
/// sh.run(&mut ScriptedInput::new([r#"greet "big world""#, "exit"]), &mut out).unwrap();
/// assert_eq!(out.contents(), "Hello, big world!\nConsole closed.\n");
/// ```
pub struct Shell {
    config: ShellConfig,
    registry: CommandRegistry,
}

impl Shell {
    /// Creates a shell whose registry already holds the `help` command.
    pub fn new(config: ShellConfig) -> Self {
        let mut registry = CommandRegistry::new(config.lowercase_commands);
        if let Err(err) = registry.insert(builtin::help_signature(), Target::Help) {
            unreachable!("fresh registry rejected help: {err}");
        }
        Self { config, registry }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Registers a command. Fails once the shell has been launched.
    pub fn register(
        &mut self,
        signature: CommandSignature,
        handler: impl CommandHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.registry.register(signature, handler)
    }

    /// Registers a closure as a command handler.
    pub fn add<F>(&mut self, signature: CommandSignature, handler: F) -> Result<(), RegistryError>
    where
        F: FnMut(&mut Invocation<'_>) -> anyhow::Result<()> + 'static,
    {
        self.registry.register(signature, handler)
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSignature> {
        self.registry.lookup(name)
    }

    /// Runs the interactive loop on the terminal until an exit alias, EOF or Ctrl-C.
    pub fn launch(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        self.run(&mut rl, &mut std::io::stdout())
    }

    /// Runs the read loop on an arbitrary line source.
    pub fn run(&mut self, input: &mut dyn LineSource, out: &mut dyn Write) -> anyhow::Result<()> {
        self.registry.freeze();
        info!("console launched with {} commands", self.registry.len());

        let prompt = format!("{} ", self.config.prompt);
        loop {
            let Some(line) = input.read_line(&prompt)? else {
                self.shutdown(out)?;
                break;
            };
            if self.execute_line(&line, out)? == LoopControl::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Handles one input line, printing a diagnostic if dispatch fails.
    ///
    /// Only I/O errors on `out` are returned; dispatch failures are reported
    /// on `out` and the loop is told to continue.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> anyhow::Result<LoopControl> {
        if line.trim().is_empty() {
            return Ok(LoopControl::Continue);
        }
        if self.config.is_exit_alias(line) {
            self.shutdown(out)?;
            return Ok(LoopControl::Exit);
        }

        if let Err(err) = self.dispatch(line, out) {
            match &err {
                DispatchError::HandlerFailed(cause) => error!("command failed: {cause:#}"),
                other => warn!("dispatch failed: {other:?}"),
            }
            writeln!(out, "{err}")?;
        }
        Ok(LoopControl::Continue)
    }

    /// Runs one dispatch cycle for `line`, writing command output to `out`.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> Result<(), DispatchError> {
        let Some((word, rest)) = lexer::split_command_word(line) else {
            return Ok(());
        };
        let index = self
            .registry
            .find(word)
            .ok_or_else(|| DispatchError::CommandNotFound {
                name: word.to_string(),
            })?;

        let signature = &self.registry.entry(index).signature;
        let strategy = BindingStrategy::for_signature(signature);
        let args = if strategy == BindingStrategy::NoArgs {
            if !rest.is_empty() && !self.config.ignore_minor_errors {
                writeln!(out, "/!\\ This function does not require any arguments. /!\\")
                    .map_err(|e| DispatchError::HandlerFailed(e.into()))?;
            }
            BoundArgs::default()
        } else {
            let tokens = lexer::split_into_tokens(rest)?;
            debug!("tokens: {tokens:?}");
            let classified = parser::classify(tokens, &self.config.optional_args_prefix)?;
            binder::bind(signature, classified)?
        };

        self.invoke(index, args, out)
    }

    fn invoke(
        &mut self,
        index: usize,
        args: BoundArgs,
        out: &mut dyn Write,
    ) -> Result<(), DispatchError> {
        let given = args.len();
        let entry = self.registry.entry_mut(index);

        let Target::Handler(handler) = &mut entry.target else {
            return builtin::render_help(&self.registry, &self.config, out)
                .map_err(|e| DispatchError::HandlerFailed(e.into()));
        };

        let mut replacement = None;
        let result = {
            let mut invocation = Invocation::new(args, out, &mut entry.signature, &mut replacement);
            handler.call(&mut invocation)
        };
        if let Some(new_handler) = replacement {
            debug!("command '{}' replaced its handler", entry.signature.name());
            entry.target = Target::Handler(new_handler);
        }

        result.map_err(|err| {
            if err.downcast_ref::<ShapeError>().is_some() {
                let required = entry.signature.required_args().len();
                DispatchError::HandlerArity {
                    expected: (required > 0).then_some(required),
                    given,
                }
            } else {
                DispatchError::HandlerFailed(err)
            }
        })
    }

    fn shutdown(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        info!("console closed");
        if let Some(message) = &self.config.end_message {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgumentSpec, BoundValue};
    use crate::io_adapters::{MemWriter, ScriptedInput};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<BoundArgs>>>;

    /// Registers a command that records the arguments of every call.
    fn recording(shell: &mut Shell, signature: CommandSignature) -> Calls {
        let calls: Calls = Rc::default();
        let sink = calls.clone();
        shell
            .add(signature, move |inv| {
                sink.borrow_mut().push(inv.args().clone());
                Ok(())
            })
            .unwrap();
        calls
    }

    fn session(shell: &mut Shell, lines: &[&str]) -> String {
        let mut out = MemWriter::new();
        shell
            .run(&mut ScriptedInput::new(lines.iter().copied()), &mut out)
            .unwrap();
        out.contents()
    }

    fn sig(name: &str) -> CommandSignature {
        CommandSignature::new(name).unwrap()
    }

    #[test]
    fn test_unterminated_quote_keeps_loop_alive() {
        let mut shell = Shell::default();
        let calls = recording(&mut shell, sig("say").with_required(ArgumentSpec::new("text")));

        let output = session(&mut shell, &[r#"say "hi"#, "say ok", "exit"]);

        assert_eq!(output, "The string never ends.\nConsole closed.\n");
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].arg(0), Ok("ok"));
    }

    #[test]
    fn test_missing_named_value_keeps_loop_alive() {
        let mut shell = Shell::default();
        let calls = recording(
            &mut shell,
            sig("cmd")
                .with_required(ArgumentSpec::new("a"))
                .with_optional(ArgumentSpec::new("o")),
        );

        let output = session(&mut shell, &["cmd x --o", "cmd x --o 1", "exit"]);

        assert_eq!(
            output,
            "No value has been given for the argument 'o'\nConsole closed.\n"
        );
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].get_named("o"), Some("1"));
    }

    #[test]
    fn test_command_not_found() {
        let mut shell = Shell::default();
        let output = session(&mut shell, &["nope 1 2"]);
        assert_eq!(
            output,
            "Command not found. Type 'help' for the list of available commands.\nConsole closed.\n"
        );
    }

    #[test]
    fn test_arity_mismatch_reports_counts() {
        let mut shell = Shell::default();
        let calls = recording(
            &mut shell,
            sig("pair")
                .with_required(ArgumentSpec::new("a"))
                .with_required(ArgumentSpec::new("b")),
        );

        let output = session(&mut shell, &["pair x"]);
        assert!(output.starts_with("This function requires 2 arguments, got 1.\n"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_overflow_and_named_arguments_reach_handler() {
        let mut shell = Shell::default();
        let calls = recording(
            &mut shell,
            sig("collect")
                .with_required(ArgumentSpec::new("first"))
                .with_optional(ArgumentSpec::new("tag"))
                .capture_overflow(true),
        );

        session(&mut shell, &[r#"collect x --tag "a b" y z"#]);

        let calls = calls.borrow();
        assert_eq!(
            calls[0].values(),
            [
                BoundValue::Token("x".to_string()),
                BoundValue::Overflow(vec!["y".to_string(), "z".to_string()]),
            ]
        );
        assert_eq!(calls[0].get_named("tag"), Some("a b"));
    }

    #[test]
    fn test_no_args_command_warns_but_runs() {
        let mut shell = Shell::default();
        let calls = recording(&mut shell, sig("ping"));

        let output = session(&mut shell, &[r#"ping "unbalanced"#]);

        assert_eq!(
            output,
            "/!\\ This function does not require any arguments. /!\\\nConsole closed.\n"
        );
        assert_eq!(calls.borrow().len(), 1);
        assert!(calls.borrow()[0].is_empty());
    }

    #[test]
    fn test_ignore_minor_errors_silences_warning() {
        let mut shell = Shell::new(ShellConfig {
            ignore_minor_errors: true,
            end_message: None,
            ..Default::default()
        });
        let calls = recording(&mut shell, sig("ping"));

        let output = session(&mut shell, &["ping extra"]);

        assert_eq!(output, "");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_handler_shape_rejection() {
        let mut shell = Shell::default();
        shell
            .add(
                sig("opt")
                    .with_required(ArgumentSpec::new("a"))
                    .with_optional(ArgumentSpec::new("known")),
                |inv| {
                    inv.args().accept_named(&["known"])?;
                    Ok(())
                },
            )
            .unwrap();
        shell
            .add(sig("flags").with_optional(ArgumentSpec::new("x")), |inv| {
                inv.args().accept_named(&["x"])?;
                Ok(())
            })
            .unwrap();

        let output = session(&mut shell, &["opt 1 --other 2", "flags --y 1"]);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("This function requires 1 arguments, got 1."));
        assert_eq!(lines[1], "This function requires no arguments, got 0.");
    }

    #[test]
    fn test_handler_failure_is_recoverable() {
        let mut shell = Shell::default();
        shell
            .add(sig("boom"), |_| Err(anyhow::anyhow!("kaput")))
            .unwrap();
        let calls = recording(&mut shell, sig("after"));

        let output = session(&mut shell, &["boom", "after"]);

        assert_eq!(output, "Error: kaput\nConsole closed.\n");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_case_folding() {
        let mut shell = Shell::new(ShellConfig {
            lowercase_commands: true,
            ..Default::default()
        });
        assert!(shell.config().lowercase_commands);
        let calls = recording(&mut shell, sig("Greet"));
        session(&mut shell, &["GREET", "greet"]);
        assert_eq!(calls.borrow().len(), 2);

        let mut strict = Shell::default();
        let calls = recording(&mut strict, sig("Greet"));
        session(&mut strict, &["greet"]);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_custom_prefix_and_aliases() {
        let mut shell = Shell::new(ShellConfig {
            optional_args_prefix: "-".to_string(),
            exit_aliases: vec!["bye".to_string()],
            end_message: Some("Bye!".to_string()),
            ..Default::default()
        });
        let calls = recording(
            &mut shell,
            CommandSignature::new(["list", "ls"])
                .unwrap()
                .with_optional(ArgumentSpec::new("sort")),
        );

        let output = session(&mut shell, &["ls -sort name", "BYE", "list"]);

        assert_eq!(output, "Bye!\n");
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].get_named("sort"), Some("name"));
    }

    #[test]
    fn test_handler_can_rewrite_its_descriptor() {
        fn second(inv: &mut Invocation<'_>) -> anyhow::Result<()> {
            writeln!(inv.out(), "second")?;
            inv.signature_mut().set_description(Some("used twice".to_string()));
            Ok(())
        }

        let mut shell = Shell::default();
        shell
            .add(sig("once").with_description("call me once"), |inv| {
                writeln!(inv.out(), "first")?;
                inv.signature_mut().set_description(Some("used".to_string()));
                inv.replace_handler(second);
                Ok(())
            })
            .unwrap();

        let output = session(&mut shell, &["once", "once"]);
        assert_eq!(output, "first\nsecond\nConsole closed.\n");
        assert_eq!(shell.lookup("once").unwrap().description(), Some("used twice"));
    }

    #[test]
    fn test_registry_frozen_after_launch() {
        let mut shell = Shell::default();
        assert!(!shell.registry().is_frozen());
        session(&mut shell, &[]);
        assert!(shell.registry().is_frozen());
        assert_eq!(
            shell.add(sig("late"), |_| Ok(())),
            Err(RegistryError::FrozenRegistry)
        );
    }

    #[test]
    fn test_help_is_registered_and_reserved() {
        let mut shell = Shell::default();
        assert!(shell.lookup("help").is_some());
        assert_eq!(
            shell.add(sig("help"), |_| Ok(())),
            Err(RegistryError::DuplicateCommand("help".to_string()))
        );

        let output = session(&mut shell, &["help"]);
        assert!(output.starts_with("Help :\n- help : The help command, displays this message.\n"));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut shell = Shell::default();
        let output = session(&mut shell, &["", "   ", "quit"]);
        assert_eq!(output, "Console closed.\n");
    }
}
