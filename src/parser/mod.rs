//! Parser for the shell input language
//!
//! This module contains the argument tokenizer, the literal parser and the
//! command call parser.

pub mod line_parser;
pub mod literal;
pub mod tokenizer;
pub mod types;

// Re-exports
pub use line_parser::{parse_line, ParsedLine, VarForm, VarRhs};
pub use literal::{parse_arguments, parse_literal};
pub use tokenizer::{group, is_flag, GroupedTokens, KeywordSlot, Tokenizer};
pub use types::{Arguments, CommandCall, SyntaxError, Token};
