//! Interpreter: session context, error taxonomy, evaluator registry and
//! the per-line evaluation loop.

pub mod arith;
pub mod context;
pub mod errors;
pub mod evaluators;
pub mod interpreter;

pub use arith::ArithEvaluator;
pub use context::Context;
pub use errors::ShellError;
pub use evaluators::{EchoEvaluator, EvaluatorRegistry, ExpressionEvaluator};
pub use interpreter::Interpreter;
