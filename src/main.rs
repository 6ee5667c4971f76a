use anyhow::Result;
use argh::FromArgs;
use shell_console::{ArgumentSpec, CommandSignature, Invocation, Shell, ShellConfig, convert_type};
use std::io::Write;

#[derive(FromArgs)]
/// Interactive demo console with a few sample commands.
struct Options {
    #[argh(option, default = "String::from(\">>>\")")]
    /// text shown before every input line
    prompt: String,

    #[argh(option, default = "String::from(\"--\")")]
    /// prefix introducing named arguments
    prefix: String,

    #[argh(switch)]
    /// match command names case-insensitively
    lowercase: bool,

    #[argh(switch)]
    /// do not warn when a command without arguments receives some
    ignore_minor_errors: bool,

    #[argh(switch)]
    /// print nothing for commands without a description in help
    quiet_help: bool,

    #[argh(option)]
    /// extra command that closes the console (repeatable)
    exit_alias: Vec<String>,
}

fn test_command(inv: &mut Invocation<'_>) -> Result<()> {
    writeln!(inv.out(), "I am just a testing function. Nothing else.")?;
    Ok(())
}

fn arg_command(inv: &mut Invocation<'_>) -> Result<()> {
    let args = inv.args().clone();
    writeln!(inv.out(), "You inputted : {} and {}", args.arg(0)?, args.arg(1)?)?;
    let others = args.overflow().unwrap_or_default();
    writeln!(inv.out(), "{:?}", others)?;
    Ok(())
}

fn optional_args_command(inv: &mut Invocation<'_>) -> Result<()> {
    let args = inv.args().clone();
    args.accept_named(&["arg1", "arg2"])?;

    let required = convert_type(args.arg(0)?);
    let arg1 = convert_type(args.get_named("arg1").unwrap_or("0"));
    let arg2 = convert_type(args.get_named("arg2").unwrap_or("1"));

    let out = inv.out();
    writeln!(out, "Required argument : {} with type {}", required, required.type_name())?;
    writeln!(out, "Arg 1 : {} with type {}", arg1, arg1.type_name())?;
    writeln!(out, "Arg 2 : {} with type {}", arg2, arg2.type_name())?;
    Ok(())
}

fn only_call_me_once(inv: &mut Invocation<'_>) -> Result<()> {
    writeln!(inv.out(), "It's ok :D")?;
    inv.signature_mut()
        .set_description(Some("YOU ALREADY CALLED IT !".to_string()));
    inv.replace_handler(told_you);
    Ok(())
}

fn told_you(inv: &mut Invocation<'_>) -> Result<()> {
    writeln!(inv.out(), "TOLD YOU TO ONLY CALL ME ONCE !")?;
    inv.signature_mut().set_description(Some("YOU FOOL !".to_string()));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let options: Options = argh::from_env();

    let mut config = ShellConfig {
        prompt: options.prompt,
        optional_args_prefix: options.prefix,
        lowercase_commands: options.lowercase,
        ignore_minor_errors: options.ignore_minor_errors,
        help_ignore_no_description: options.quiet_help,
        ..Default::default()
    };
    config.exit_aliases.extend(options.exit_alias);

    let mut shell = Shell::new(config);

    shell.register(
        CommandSignature::new("test")?.with_description("A testing function."),
        test_command,
    )?;
    shell.register(
        CommandSignature::new("arg_command")?
            .with_description("A command with arguments")
            .with_required(ArgumentSpec::new("arg").with_description("Just some random argument"))
            .with_required(ArgumentSpec::new("arg2"))
            .capture_overflow(true),
        arg_command,
    )?;
    shell.register(
        CommandSignature::new("optional_args_command")?
            .with_description("A command with optional arguments")
            .with_required(ArgumentSpec::new("required").with_description("A required argument"))
            .with_optional(ArgumentSpec::new("arg1").with_description("Just a named argument"))
            .with_optional(ArgumentSpec::new("arg2").with_description("Another named argument")),
        optional_args_command,
    )?;
    shell.register(
        CommandSignature::new("only_call_me_once")?
            .with_description("ONLY CALL IT ONCE !")
            .show_arg_help_when_empty(false),
        only_call_me_once,
    )?;
    shell.add(
        CommandSignature::new(["test_fx", "fx"])?
            .with_description("A function to test in-place command creation."),
        |inv| {
            writeln!(inv.out(), "test_fx")?;
            Ok(())
        },
    )?;

    shell.launch()
}
