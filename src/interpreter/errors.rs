//! Shell Errors
//!
//! The single error taxonomy surfaced by the interpreter. Every variant is
//! raised together with the diagnostic stack that was live at the point of
//! failure; the interpreter renders both at the top of its loop.

use thiserror::Error;

use crate::parser::SyntaxError;
use crate::shell::binder::BindError;

#[derive(Debug, Error)]
pub enum ShellError {
    /// Malformed literal, unterminated string or bracket, unknown escape,
    /// unrecognized token.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    /// A dotted path did not resolve to a command.
    #[error("no such command: '{0}'")]
    NoSuchCommand(String),

    /// Structural or type argument error on a single-signature command.
    #[error("{0}")]
    Bind(#[from] BindError),

    /// Every signature of an overloaded command rejected the arguments.
    #[error("no matching overload for '{command}'")]
    NoMatchingOverload {
        command: String,
        causes: Vec<BindError>,
    },

    /// A handler failed; the message is preserved.
    #[error("{command}: {message}")]
    Handler { command: String, message: String },
}

impl ShellError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShellError::Syntax(_) => "SyntaxError",
            ShellError::NoSuchCommand(_) => "NoSuchCommand",
            ShellError::Bind(err) => err.kind.name(),
            ShellError::NoMatchingOverload { .. } => "NoMatchingOverload",
            ShellError::Handler { .. } => "HandlerError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::binder::BindErrorKind;

    #[test]
    fn test_kind_names() {
        let err = ShellError::NoSuchCommand("unknown.path".into());
        assert_eq!(err.kind_name(), "NoSuchCommand");
        assert_eq!(err.to_string(), "no such command: 'unknown.path'");

        let bind = ShellError::Bind(BindError::new(
            BindErrorKind::MissingArgument,
            "missing argument for parameter val: Any",
            None,
        ));
        assert_eq!(bind.kind_name(), "MissingArgument");
    }
}
