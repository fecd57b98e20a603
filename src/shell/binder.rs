//! Argument Binder
//!
//! Matches parsed arguments to a command's typed parameter list: positional
//! distribution, keyword lookup, defaults, deferred-value coercion and type
//! checking. Overload dispatch is driven by a three-way outcome: only a
//! wrong argument shape falls through to the next signature; an evaluation
//! failure aborts dispatch.

use indexmap::IndexMap;
use thiserror::Error;

use crate::diagnostics::{Frame, Span};
use crate::interpreter::{Interpreter, ShellError};
use crate::parser::Arguments;
use crate::value::Value;

use super::command::{BoundArgs, Command, ParamMode, Parameter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindErrorKind {
    ExtraPositional,
    ExtraKeyword,
    DuplicateArgument,
    MissingArgument,
    TypeMismatch,
}

impl BindErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            BindErrorKind::ExtraPositional => "ExtraPositional",
            BindErrorKind::ExtraKeyword => "ExtraKeyword",
            BindErrorKind::DuplicateArgument => "DuplicateArgument",
            BindErrorKind::MissingArgument => "MissingArgument",
            BindErrorKind::TypeMismatch => "TypeMismatch",
        }
    }
}

/// A structural or type error for one signature.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct BindError {
    pub kind: BindErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl BindError {
    pub fn new(kind: BindErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self { kind, message: message.into(), span }
    }
}

/// Result of binding against one signature.
pub enum BindOutcome {
    Bound(BoundArgs),
    /// The argument shape does not fit; overload dispatch may continue.
    WrongShape(BindError),
    /// Evaluating a deferred argument failed; dispatch must stop.
    Fatal(ShellError),
}

fn push_frame(interp: &mut Interpreter, args: &Arguments, span: Span) {
    let content = args
        .full
        .get(span.begin..span.end)
        .unwrap_or_default()
        .to_string();
    interp
        .trace_mut()
        .push(Frame::new("<argument>", span, args.full.clone(), content));
}

struct Slot {
    value: Value,
    span: Option<Span>,
    from_default: bool,
}

/// Bind arguments against a single parameter list.
pub fn bind_overload(
    params: &[Parameter],
    args: &Arguments,
    interp: &mut Interpreter,
) -> BindOutcome {
    let mut slots: IndexMap<String, Slot> = IndexMap::new();

    // 1. Distribute positional arguments over positional-capable
    // parameters in order.
    let positional_params: Vec<&Parameter> = params
        .iter()
        .filter(|p| p.mode != ParamMode::Keyword)
        .collect();
    for (index, (value, span)) in args.positional.iter().enumerate() {
        match positional_params.get(index) {
            Some(param) => {
                slots.insert(
                    param.name.clone(),
                    Slot { value: value.clone(), span: Some(*span), from_default: false },
                );
            }
            None => {
                return BindOutcome::WrongShape(BindError::new(
                    BindErrorKind::ExtraPositional,
                    format!("extra positional argument {}", value),
                    Some(*span),
                ));
            }
        }
    }

    // 2. Keyword arguments by name.
    for (key, (value, span)) in &args.keyword {
        let Some(param) = params.iter().find(|p| p.name == *key) else {
            return BindOutcome::WrongShape(BindError::new(
                BindErrorKind::ExtraKeyword,
                format!("no parameter named '{}'", key),
                Some(*span),
            ));
        };
        if param.mode == ParamMode::Positional {
            return BindOutcome::WrongShape(BindError::new(
                BindErrorKind::ExtraKeyword,
                format!("parameter '{}' cannot be passed by keyword", key),
                Some(*span),
            ));
        }
        if slots.contains_key(key) {
            return BindOutcome::WrongShape(BindError::new(
                BindErrorKind::DuplicateArgument,
                format!("duplicate argument for parameter '{}'", key),
                Some(*span),
            ));
        }
        slots.insert(
            key.clone(),
            Slot { value: value.clone(), span: Some(*span), from_default: false },
        );
    }

    // 3. Defaults for the rest; anything still missing is an error.
    for param in params {
        if !slots.contains_key(&param.name) {
            match &param.default {
                Some(default) => {
                    slots.insert(
                        param.name.clone(),
                        Slot { value: default.clone(), span: None, from_default: true },
                    );
                }
                None => {
                    return BindOutcome::WrongShape(BindError::new(
                        BindErrorKind::MissingArgument,
                        format!("missing argument for parameter {}", param),
                        None,
                    ));
                }
            }
        }
    }

    // 4. Coercion and type checking, in declaration order.
    let mut bound = IndexMap::new();
    for param in params {
        let Some(slot) = slots.swap_remove(&param.name) else {
            continue;
        };

        // A defaulted value, or a supplied value equal to the default,
        // passes through uncoerced.
        if slot.from_default || param.default.as_ref() == Some(&slot.value) {
            bound.insert(param.name.clone(), slot.value);
            continue;
        }

        if let Some(span) = slot.span {
            push_frame(interp, args, span);
        }

        let value = match evaluate_if_needed(&slot.value, param, interp) {
            Ok(value) => value,
            Err(err) => return BindOutcome::Fatal(err),
        };

        if !param.ty.matches(&value) {
            return BindOutcome::WrongShape(BindError::new(
                BindErrorKind::TypeMismatch,
                format!(
                    "value {} does not match spec of parameter {}",
                    value, param
                ),
                slot.span,
            ));
        }

        if slot.span.is_some() {
            interp.trace_mut().pop();
        }
        bound.insert(param.name.clone(), value);
    }

    BindOutcome::Bound(BoundArgs::new(bound))
}

/// Evaluate a deferred value when the target parameter requires it.
///
/// An auto-evaluate marker forces evaluation regardless of the declared
/// type; otherwise a deferred value is kept as-is only when the declared
/// type is unconstrained or names the same deferred kind.
fn evaluate_if_needed(
    value: &Value,
    param: &Parameter,
    interp: &mut Interpreter,
) -> Result<Value, ShellError> {
    let needs_eval = match value {
        Value::Expression(expr) => {
            expr.auto_evaluate || !param.ty.accepts_deferred("Expression")
        }
        Value::Block(block) => block.auto_evaluate || !param.ty.accepts_deferred("Block"),
        Value::Variable(_) => !param.ty.accepts_deferred("Variable"),
        _ => false,
    };

    if needs_eval {
        interp.force(value)
    } else {
        Ok(value.clone())
    }
}

/// Bind a call against a command, trying overloads in declaration order.
///
/// Returns the index of the matched signature and the bound arguments.
pub fn bind_call(
    command: &Command,
    args: &Arguments,
    interp: &mut Interpreter,
) -> Result<(usize, BoundArgs), ShellError> {
    if command.overloads.len() <= 1 {
        let Some(overload) = command.overloads.first() else {
            return Err(ShellError::Handler {
                command: command.name.clone(),
                message: "command has no signature".to_string(),
            });
        };
        return match bind_overload(&overload.params, args, interp) {
            BindOutcome::Bound(bound) => Ok((0, bound)),
            BindOutcome::WrongShape(err) => Err(ShellError::Bind(err)),
            BindOutcome::Fatal(err) => Err(err),
        };
    }

    let depth = interp.trace().frames().len();
    let mut causes = Vec::new();
    for (index, overload) in command.overloads.iter().enumerate() {
        match bind_overload(&overload.params, args, interp) {
            BindOutcome::Bound(bound) => return Ok((index, bound)),
            BindOutcome::WrongShape(err) => {
                interp.trace_mut().truncate(depth);
                causes.push(err);
            }
            BindOutcome::Fatal(err) => return Err(err),
        }
    }

    Err(ShellError::NoMatchingOverload {
        command: command.name.clone(),
        causes,
    })
}
