//! The `word` sub-shell: runtime registration of keyword words.
//!
//! Once a name is added it parses as a `Word` literal on every later line.

use crate::shell::{BoundArgs, Command, HandlerError, ParamType, Parameter, Shell};
use crate::value::Value;

pub fn word_shell() -> Shell {
    let mut shell = Shell::new("word");

    shell.add_command(
        Command::new("add")
            .help("Registers a keyword word")
            .signature(
                vec![Parameter::required("name", ParamType::Any)],
                |interp, args: &BoundArgs| {
                    let name = match args.value("name") {
                        Value::Str(name) => name,
                        // Re-adding an existing word is a no-op.
                        Value::Word(name) => name,
                        other => {
                            return Err(HandlerError::new(format!(
                                "expected a word name, got {}",
                                other
                            )));
                        }
                    };
                    interp.words_mut().add(&name);
                    Ok(Value::Word(name))
                },
            ),
    );

    shell.add_command(
        Command::new("list")
            .help("Lists the registered words")
            .signature(Vec::<Parameter>::new(), |interp, _: &BoundArgs| {
                Ok(Value::List(
                    interp
                        .words()
                        .iter()
                        .map(|name| Value::Word(name.to_string()))
                        .collect(),
                ))
            }),
    );

    shell
}
