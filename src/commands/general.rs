//! General builtin commands: echo, print, var, eval, help, exit.

use crate::shell::{BoundArgs, Command, HandlerError, ParamType, Parameter};
use crate::value::Value;

/// Reproduce the given value. Deferred values are realized first, so
/// `echo $x` answers with the variable's value.
pub fn echo() -> Command {
    Command::new("echo")
        .help("Reproduces the given value")
        .signature(
            vec![Parameter::required("val", ParamType::Any)],
            |interp, args: &BoundArgs| {
                let val = args.value("val");
                if val.is_deferred() {
                    return interp
                        .force(&val)
                        .map_err(|err| HandlerError::new(err.to_string()));
                }
                Ok(val)
            },
        )
}

/// Print the given value and return `None`.
pub fn print() -> Command {
    Command::new("print")
        .help("Prints the given value to stdout")
        .signature(
            vec![Parameter::required("val", ParamType::Any)],
            |_, args: &BoundArgs| {
                println!("{}", args.value("val"));
                Ok(Value::None)
            },
        )
}

/// Set or get a session variable. `$name`, `$name = v` and `$name : cmd`
/// all desugar to this command.
pub fn var() -> Command {
    Command::new("var")
        .help("Sets or gets a session variable")
        .signature(
            vec![
                Parameter::required("var", ParamType::Variable),
                Parameter::optional("val", ParamType::Any, Value::None),
            ],
            |interp, args: &BoundArgs| {
                let Value::Variable(name) = args.value("var") else {
                    return Err(HandlerError::new("expected a variable"));
                };
                let val = args.value("val");
                if val != Value::None {
                    interp.context_mut().set(name.clone(), val);
                }
                Ok(interp.context().get(&name).unwrap_or(Value::None))
            },
        )
}

/// Force a deferred value: dereference variables, evaluate expressions,
/// run blocks. Concrete values come back unchanged.
pub fn eval() -> Command {
    Command::new("eval")
        .help("Evaluates a deferred value")
        .signature(
            vec![Parameter::required("val", ParamType::Any)],
            |interp, args: &BoundArgs| {
                let val = args.value("val");
                interp
                    .force(&val)
                    .map_err(|err| HandlerError::new(err.to_string()))
            },
        )
}

/// Show a command's signature and help text, or list every command path.
pub fn help() -> Command {
    Command::new("help")
        .help("Shows help for a command, or lists all commands")
        .signature(
            vec![Parameter::optional("command", ParamType::Str, Value::None)],
            |interp, args: &BoundArgs| {
                let text = match args.value("command") {
                    Value::Str(path) => {
                        let Some(command) = interp.shell().resolve(&path) else {
                            return Err(HandlerError::new(format!(
                                "no such command: '{}'",
                                path
                            )));
                        };
                        let mut text = command.signature_line();
                        if let Some(help) = &command.help {
                            text.push_str("\n    ");
                            text.push_str(help);
                        }
                        text
                    }
                    _ => interp.shell().completions().join("\n"),
                };
                println!("{}", text);
                Ok(Value::None)
            },
        )
}

/// Leave the read-eval loop.
pub fn exit() -> Command {
    Command::new("exit")
        .help("Exits the shell")
        .signature(Vec::<Parameter>::new(), |interp, _: &BoundArgs| {
            interp.stop();
            Ok(Value::None)
        })
}
