//! shellsy - an extensible interactive shell with typed commands
//!
//! The command surface is defined programmatically: each command is a typed
//! function, commands group into nested sub-shells, and a command may carry
//! overload signatures chosen by argument shape. This library provides the
//! language front end (literal grammar, argument tokenizer, line parser)
//! and the dispatch engine (registry, binder, interpreter).

pub mod commands;
pub mod diagnostics;
pub mod interpreter;
pub mod parser;
pub mod shell;
pub mod shellsy;
pub mod value;

pub use diagnostics::{Frame, Span, StackTrace};
pub use interpreter::{Context, Interpreter, ShellError};
pub use parser::{parse_line, Arguments, CommandCall, ParsedLine, SyntaxError};
pub use shell::{Command, HandlerError, ParamMode, ParamType, Parameter, Shell};
pub use shellsy::Shellsy;
pub use value::{Value, WordSet};
