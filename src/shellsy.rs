//! Shellsy Environment
//!
//! Ties together the default command tree, the default word set and the
//! default expression evaluator behind one type the binary (or an
//! embedding host) drives line by line.

use std::rc::Rc;

use crate::commands::default_shell;
use crate::interpreter::{ArithEvaluator, Interpreter, ShellError};
use crate::value::Value;

/// Register the evaluators the shipped shell comes with: the arithmetic
/// evaluator under `expr`, which is also the default prefix.
pub fn install_default_evaluators(interpreter: &mut Interpreter) {
    interpreter
        .evaluators_mut()
        .register("expr", Rc::new(ArithEvaluator));
    interpreter.evaluators_mut().set_default("expr");
}

/// The main shell environment.
pub struct Shellsy {
    interpreter: Interpreter,
}

impl Shellsy {
    pub fn new() -> Self {
        let mut interpreter = Interpreter::new(default_shell());
        install_default_evaluators(&mut interpreter);
        Self { interpreter }
    }

    /// Evaluate one input line, recording the result in the session
    /// context.
    pub fn eval(&mut self, line: &str) -> Result<Value, ShellError> {
        self.interpreter.eval(line)
    }

    /// Render an error with the diagnostic stack of the failed line.
    pub fn render_error(&self, error: &ShellError) -> String {
        self.interpreter.render_error(error)
    }

    /// False once `exit` has run.
    pub fn is_running(&self) -> bool {
        self.interpreter.is_running()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }
}

impl Default for Shellsy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
