//! Value model for the shell language.

pub mod display;
pub mod types;

pub use types::{Block, Expression, Value, WordSet, DEFAULT_WORDS};
