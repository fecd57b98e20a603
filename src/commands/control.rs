//! Conditional and loop commands.
//!
//! `if` and `while` take their condition as an unevaluated expression and
//! their branches as unevaluated blocks, evaluating them as control flow
//! dictates.

use crate::interpreter::Interpreter;
use crate::shell::{BoundArgs, Command, HandlerError, ParamType, Parameter};
use crate::value::Value;

fn condition_of(interp: &mut Interpreter, args: &BoundArgs) -> Result<bool, HandlerError> {
    let Value::Expression(expr) = args.value("condition") else {
        return Err(HandlerError::new("expected an expression"));
    };
    let value = interp
        .eval_expression(&expr)
        .map_err(|err| HandlerError::new(err.to_string()))?;
    Ok(value.is_truthy())
}

fn run_block(
    interp: &mut Interpreter,
    args: &BoundArgs,
    name: &str,
) -> Result<Value, HandlerError> {
    match args.value(name) {
        Value::Block(block) => interp
            .eval_block(&block)
            .map_err(|err| HandlerError::new(err.to_string())),
        Value::None => Ok(Value::None),
        other => Err(HandlerError::new(format!(
            "expected a command block, got {}",
            other
        ))),
    }
}

/// `if (cond) {then} else {otherwise}` — the `else` word and block are
/// optional.
pub fn if_cmd() -> Command {
    Command::new("if")
        .help("Runs a block when the condition holds, else an optional block")
        .signature(
            vec![
                Parameter::required("condition", ParamType::Expression),
                Parameter::required("then", ParamType::Block),
                Parameter::optional("__", ParamType::Word("else".into()), Value::None),
                Parameter::optional("else_", ParamType::Block, Value::None),
            ],
            |interp, args: &BoundArgs| {
                if condition_of(interp, args)? {
                    run_block(interp, args, "then")
                } else {
                    run_block(interp, args, "else_")
                }
            },
        )
}

/// `while (cond) {body}` — re-evaluates the condition before every pass;
/// the last body value is returned.
pub fn while_cmd() -> Command {
    Command::new("while")
        .help("Runs a block repeatedly while the condition holds")
        .signature(
            vec![
                Parameter::required("condition", ParamType::Expression),
                Parameter::required("then", ParamType::Block),
            ],
            |interp, args: &BoundArgs| {
                let mut last = Value::None;
                while condition_of(interp, args)? {
                    last = run_block(interp, args, "then")?;
                }
                Ok(last)
            },
        )
}

#[cfg(test)]
mod tests {
    use crate::commands::default_shell;
    use crate::interpreter::Interpreter;
    use crate::value::Value;

    fn interp() -> Interpreter {
        let mut interp = Interpreter::new(default_shell());
        crate::shellsy::install_default_evaluators(&mut interp);
        interp
    }

    #[test]
    fn test_if_then() {
        let mut interp = interp();
        assert_eq!(
            interp.eval("if (1 < 2) {echo 'yes'}").unwrap(),
            Value::Str("yes".into())
        );
    }

    #[test]
    fn test_if_false_without_else() {
        let mut interp = interp();
        assert_eq!(interp.eval("if (1 > 2) {echo 'yes'}").unwrap(), Value::None);
    }

    #[test]
    fn test_if_else() {
        let mut interp = interp();
        assert_eq!(
            interp
                .eval("if (1 > 2) {echo 'yes'} else {echo 'no'}")
                .unwrap(),
            Value::Str("no".into())
        );
    }

    #[test]
    fn test_if_condition_sees_variables() {
        let mut interp = interp();
        interp.eval("$x = 7").unwrap();
        assert_eq!(
            interp.eval("if (x > 5) {echo 'big'} else {echo 'small'}").unwrap(),
            Value::Str("big".into())
        );
    }

    #[test]
    fn test_while_counts_down() {
        let mut interp = interp();
        interp.eval("$n = 3").unwrap();
        let result = interp.eval("while (n > 0) {$n : eval ((n - 1))}").unwrap();
        assert_eq!(result, Value::Int("0".into()));
        assert_eq!(interp.context().get("n"), Some(Value::Int("0".into())));
    }

    #[test]
    fn test_while_never_runs() {
        let mut interp = interp();
        assert_eq!(interp.eval("while (0) {echo 1}").unwrap(), Value::None);
    }
}
