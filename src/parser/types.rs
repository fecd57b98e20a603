//! Parser Types
//!
//! Shared types used across the tokenizer, literal parser and line parser.

use indexmap::IndexMap;
use thiserror::Error;

use crate::diagnostics::Span;
use crate::value::Value;

/// Error raised for malformed literals, unterminated strings or brackets,
/// unknown escapes and unrecognized tokens.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// Byte span of the offending content within the original input line.
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

/// A raw argument token: an exact slice of the input line plus its offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Byte offset of the token within the original input line.
    pub offset: usize,
    pub text: String,
}

impl Token {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self { offset, text: text.into() }
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }
}

/// Parsed arguments of one command call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub positional: Vec<(Value, Span)>,
    pub keyword: IndexMap<String, (Value, Span)>,
    /// The full input line the spans point into, kept for diagnostics.
    pub full: String,
}

impl Arguments {
    pub fn empty(full: impl Into<String>) -> Self {
        Self { positional: Vec::new(), keyword: IndexMap::new(), full: full.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// A parsed command invocation: dotted path plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCall {
    pub path: String,
    pub path_span: Span,
    pub arguments: Arguments,
}
