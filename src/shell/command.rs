//! Typed Commands
//!
//! A command is a handler plus a typed parameter list, with zero or more
//! overload signatures tried in declaration order when the primary
//! signature does not fit the argument shape.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::interpreter::Interpreter;
use crate::value::Value;

/// Error returned by a command handler; the interpreter wraps it with a
/// frame pointing at the call site.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

/// Declared type of a parameter; drives bind-time coercion and checking.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    /// Unconstrained: accepts anything, deferred values stay deferred.
    Any,
    Int,
    Dec,
    Str,
    Path,
    Bool,
    Slice,
    Point,
    List,
    Map,
    /// Receives the variable reference itself, undereferenced.
    Variable,
    /// Receives the expression unevaluated.
    Expression,
    /// Receives the block unevaluated.
    Block,
    /// Accepts exactly one registered word.
    Word(String),
    /// Accepts any member of the union.
    OneOf(Vec<ParamType>),
}

impl ParamType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Int => matches!(value, Value::Int(_)),
            ParamType::Dec => matches!(value, Value::Int(_) | Value::Dec(_)),
            ParamType::Str => matches!(value, Value::Str(_)),
            ParamType::Path => matches!(value, Value::Path(_)),
            ParamType::Bool => matches!(value, Value::Bool(_)),
            ParamType::Slice => matches!(value, Value::Slice(..)),
            ParamType::Point => matches!(value, Value::Point(_)),
            ParamType::List => matches!(value, Value::List(_)),
            ParamType::Map => matches!(value, Value::Map(_)),
            ParamType::Variable => matches!(value, Value::Variable(_)),
            ParamType::Expression => matches!(value, Value::Expression(_)),
            ParamType::Block => matches!(value, Value::Block(_)),
            ParamType::Word(name) => matches!(value, Value::Word(n) if n == name),
            ParamType::OneOf(members) => members.iter().any(|t| t.matches(value)),
        }
    }

    /// Whether a deferred value of the given kind may be passed through
    /// unevaluated to a parameter of this type.
    pub fn accepts_deferred(&self, kind: &str) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Variable => kind == "Variable",
            ParamType::Expression => kind == "Expression",
            ParamType::Block => kind == "Block",
            ParamType::OneOf(members) => members.iter().any(|t| t.accepts_deferred(kind)),
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Any => f.write_str("Any"),
            ParamType::Int => f.write_str("Int"),
            ParamType::Dec => f.write_str("Dec"),
            ParamType::Str => f.write_str("Str"),
            ParamType::Path => f.write_str("Path"),
            ParamType::Bool => f.write_str("Bool"),
            ParamType::Slice => f.write_str("Slice"),
            ParamType::Point => f.write_str("Point"),
            ParamType::List => f.write_str("List"),
            ParamType::Map => f.write_str("Map"),
            ParamType::Variable => f.write_str("Variable"),
            ParamType::Expression => f.write_str("Expression"),
            ParamType::Block => f.write_str("Block"),
            ParamType::Word(name) => write!(f, "Word[{}]", name),
            ParamType::OneOf(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

/// What kinds of argument tokens may fill a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    Positional,
    Either,
    Keyword,
}

/// One typed parameter of a command signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: ParamType,
    /// A parameter with no default is required.
    pub default: Option<Value>,
    pub mode: ParamMode,
}

impl Parameter {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty, default: None, mode: ParamMode::Either }
    }

    pub fn optional(name: impl Into<String>, ty: ParamType, default: Value) -> Self {
        Self { name: name.into(), ty, default: Some(default), mode: ParamMode::Either }
    }

    pub fn mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// The final `name -> Value` mapping produced by the binder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: IndexMap<String, Value>,
}

impl BoundArgs {
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The bound value, or `None` (the value) for an unknown name.
    pub fn value(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::None)
    }

    pub fn int(&self, name: &str) -> Result<i64, HandlerError> {
        self.value(name)
            .as_int()
            .ok_or_else(|| HandlerError::new(format!("argument '{}' is not an integer", name)))
    }

    pub fn text(&self, name: &str) -> Result<String, HandlerError> {
        match self.value(name) {
            Value::Str(s) => Ok(s),
            other => Err(HandlerError::new(format!(
                "argument '{}' is not a string: {}",
                name, other
            ))),
        }
    }
}

pub type Handler = Box<dyn Fn(&mut Interpreter, &BoundArgs) -> Result<Value, HandlerError>>;

/// One signature: a parameter list plus the handler bound to it.
pub struct Overload {
    pub params: Vec<Parameter>,
    pub handler: Handler,
}

/// A named command with one or more signatures.
pub struct Command {
    pub name: String,
    pub help: Option<String>,
    /// The primary signature first, overloads after, in declaration order.
    pub overloads: Vec<Overload>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), help: None, overloads: Vec::new() }
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Add a signature. The first call defines the primary signature;
    /// later calls add overloads tried in order.
    pub fn signature(
        mut self,
        params: Vec<Parameter>,
        handler: impl Fn(&mut Interpreter, &BoundArgs) -> Result<Value, HandlerError> + 'static,
    ) -> Self {
        self.overloads.push(Overload { params, handler: Box::new(handler) });
        self
    }

    pub fn has_overloads(&self) -> bool {
        self.overloads.len() > 1
    }

    /// The signature line shown by `help`.
    pub fn signature_line(&self) -> String {
        let mut line = self.name.clone();
        if let Some(primary) = self.overloads.first() {
            for param in &primary.params {
                line.push_str(&format!(" ({})", param));
            }
        }
        line
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("signatures", &self.overloads.len())
            .finish()
    }
}
