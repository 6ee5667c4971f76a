//! Commands every shell knows without registration by the host.

use crate::command::CommandSignature;
use crate::config::ShellConfig;
use crate::registry::CommandRegistry;
use std::io::{self, Write};

const HELP_NAME: &str = "help";

/// Signature of the built-in help command.
pub(crate) fn help_signature() -> CommandSignature {
    CommandSignature::new(HELP_NAME)
        .expect("help is a valid command name")
        .with_description("The help command, displays this message.")
        .show_arg_help_when_empty(false)
}

/// Lists every registered command with its arguments, then the exit aliases.
pub(crate) fn render_help(
    registry: &CommandRegistry,
    config: &ShellConfig,
    out: &mut dyn Write,
) -> io::Result<()> {
    let missing = if config.help_ignore_no_description {
        ""
    } else {
        "No description provided."
    };

    writeln!(out, "Help :")?;
    for signature in registry.signatures() {
        writeln!(
            out,
            "- {} : {}",
            signature.name(),
            signature.description().unwrap_or(missing)
        )?;

        if signature.required_args().is_empty() {
            if signature.shows_arg_help_when_empty() {
                writeln!(out, "\tThis function does not require any arguments.")?;
            }
        } else {
            for arg in signature.required_args() {
                let description = arg.description.as_deref().unwrap_or(missing);
                writeln!(out, "\t{} : {}", arg.name, description)?;
            }
        }

        if signature.optional_args().is_empty() {
            if signature.shows_arg_help_when_empty() {
                writeln!(out, "\tThis function does not have any optional arguments.")?;
            }
        } else {
            for arg in signature.optional_args() {
                let description = arg.description.as_deref().unwrap_or("No description provided");
                writeln!(out, "\t{} : {}", arg.name, description)?;
            }
        }
    }

    writeln!(out, "Commands to exit the console :")?;
    for alias in &config.exit_aliases {
        writeln!(out, "- {}", alias)?;
    }
    Ok(())
}
