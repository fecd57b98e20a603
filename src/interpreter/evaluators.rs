//! Embedded-Expression Evaluators
//!
//! `(prefix#body)` fragments are evaluated through a pluggable table
//! mapping prefixes to evaluators. Registration is open; the default
//! prefix (used by bare `(body)` expressions) is whatever the host
//! installs as such.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::parser::SyntaxError;
use crate::value::Value;

use super::context::Context;

pub trait ExpressionEvaluator {
    /// Evaluate an expression body against the session context.
    ///
    /// A returned [`SyntaxError`] carries a span relative to the body.
    fn evaluate(&self, context: &mut Context, body: &str) -> Result<Value, SyntaxError>;
}

#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    table: IndexMap<String, Rc<dyn ExpressionEvaluator>>,
    default_prefix: Option<String>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefix: impl Into<String>, evaluator: Rc<dyn ExpressionEvaluator>) {
        self.table.insert(prefix.into(), evaluator);
    }

    /// Select the prefix used by expressions written without one.
    pub fn set_default(&mut self, prefix: impl Into<String>) {
        self.default_prefix = Some(prefix.into());
    }

    pub fn default_prefix(&self) -> Option<&str> {
        self.default_prefix.as_deref()
    }

    /// Resolve an explicit or defaulted prefix to its evaluator.
    pub fn resolve(&self, prefix: Option<&str>) -> Option<Rc<dyn ExpressionEvaluator>> {
        let name = prefix.or(self.default_prefix.as_deref())?;
        self.table.get(name).cloned()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(|s| s.as_str())
    }
}

/// Evaluator that returns the expression body verbatim as a string.
///
/// Useful as a stub where no real evaluator is wanted.
pub struct EchoEvaluator;

impl ExpressionEvaluator for EchoEvaluator {
    fn evaluate(&self, _context: &mut Context, body: &str) -> Result<Value, SyntaxError> {
        Ok(Value::Str(body.to_string()))
    }
}
