//! Interpreter
//!
//! Composes the line parser, the registry and the binder for one input
//! line: parse, resolve, bind, invoke, record the result. The interpreter
//! owns the session context, the registered word set, the evaluator table
//! and the diagnostic stack.

use crate::diagnostics::{Frame, Span, StackTrace};
use crate::parser::{parse_line, Arguments, CommandCall, ParsedLine, SyntaxError, VarForm, VarRhs};
use crate::shell::binder::bind_call;
use crate::shell::Shell;
use crate::value::{Block, Expression, Value, WordSet};

use super::context::Context;
use super::errors::ShellError;
use super::evaluators::EvaluatorRegistry;

pub struct Interpreter {
    shell: Shell,
    words: WordSet,
    evaluators: EvaluatorRegistry,
    context: Context,
    trace: StackTrace,
    running: bool,
}

impl Interpreter {
    pub fn new(shell: Shell) -> Self {
        Self {
            shell,
            words: WordSet::with_defaults(),
            evaluators: EvaluatorRegistry::new(),
            context: Context::new(),
            trace: StackTrace::new(),
            running: true,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn words(&self) -> &WordSet {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut WordSet {
        &mut self.words
    }

    pub fn evaluators(&self) -> &EvaluatorRegistry {
        &self.evaluators
    }

    pub fn evaluators_mut(&mut self) -> &mut EvaluatorRegistry {
        &mut self.evaluators
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn trace(&self) -> &StackTrace {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut StackTrace {
        &mut self.trace
    }

    /// Ask the read-eval loop to stop after the current line.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Evaluate one top-level input line.
    ///
    /// On success the result is recorded in the session context (`_` and
    /// `out`); a failed line leaves the context untouched and the
    /// diagnostic stack populated for rendering.
    pub fn eval(&mut self, line: &str) -> Result<Value, ShellError> {
        self.trace.clear();
        self.trace.push(Frame::new(
            "<input>",
            Span::new(0, line.len()),
            line,
            line,
        ));

        let result = self.eval_line(line)?;
        self.trace.pop();

        match result {
            Some(value) => {
                self.context.push_result(value.clone());
                Ok(value)
            }
            None => Ok(Value::None),
        }
    }

    /// Evaluate a line without touching the result history. Used for the
    /// pieces of a block and the command form of a variable assignment.
    /// Returns `None` for blank lines and comments.
    pub fn eval_line(&mut self, line: &str) -> Result<Option<Value>, ShellError> {
        let parsed = parse_line(line, &self.words, &mut self.trace)?;
        match parsed {
            ParsedLine::Empty => Ok(None),
            ParsedLine::Host(command) => self.run_host(&command).map(Some),
            ParsedLine::VarForm(form) => self.eval_var_form(line, form).map(Some),
            ParsedLine::Call(call) => self.eval_call(&call).map(Some),
        }
    }

    /// A `$name` form is sugar for the `var` command.
    fn eval_var_form(&mut self, line: &str, form: VarForm) -> Result<Value, ShellError> {
        let mut arguments = Arguments::empty(line);
        arguments
            .positional
            .push((Value::Variable(form.name.clone()), form.name_span));

        match form.rhs {
            VarRhs::Bare => {}
            VarRhs::Literal(value, span) => arguments.positional.push((value, span)),
            VarRhs::Command(source, offset) => {
                let value = self.eval_line(&source)?.unwrap_or(Value::None);
                arguments
                    .positional
                    .push((value, Span::new(offset, offset + source.len())));
            }
        }

        let call = CommandCall {
            path: "var".to_string(),
            path_span: form.name_span,
            arguments,
        };
        self.eval_call(&call)
    }

    fn eval_call(&mut self, call: &CommandCall) -> Result<Value, ShellError> {
        self.trace.push(Frame::new(
            "<command>",
            call.path_span,
            call.arguments.full.clone(),
            call.path.clone(),
        ));

        let Some(command) = self.shell.resolve(&call.path) else {
            return Err(ShellError::NoSuchCommand(call.path.clone()));
        };
        self.trace.pop();

        let (index, bound) = bind_call(&command, &call.arguments, self)?;

        match (command.overloads[index].handler)(self, &bound) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.trace.push(Frame::new(
                    "<command>",
                    call.path_span,
                    call.arguments.full.clone(),
                    call.path.clone(),
                ));
                Err(ShellError::Handler {
                    command: call.path.clone(),
                    message: err.0,
                })
            }
        }
    }

    /// Evaluate the pieces of a block in order; the last value wins.
    pub fn eval_block(&mut self, block: &Block) -> Result<Value, ShellError> {
        let mut last = Value::None;
        for source in &block.commands {
            if let Some(value) = self.eval_line(source)? {
                last = value;
            }
        }
        Ok(last)
    }

    /// Evaluate an embedded expression through the registered evaluator
    /// for its prefix.
    pub fn eval_expression(&mut self, expr: &Expression) -> Result<Value, ShellError> {
        let Some(evaluator) = self.evaluators.resolve(expr.prefix.as_deref()) else {
            let shown = expr.prefix.as_deref().unwrap_or("<default>");
            let text = expr.to_string();
            let span = Span::new(1, 1 + shown.len());
            self.trace
                .push(Frame::new("<expr>", span, text, shown.to_string()));
            return Err(ShellError::Syntax(SyntaxError::new(
                format!("unrecognised expression prefix '{}'", shown),
                span,
            )));
        };

        evaluator
            .evaluate(&mut self.context, &expr.body)
            .map_err(|err| {
                let content = expr
                    .body
                    .get(err.span.begin..err.span.end)
                    .unwrap_or(&expr.body)
                    .to_string();
                self.trace
                    .push(Frame::new("<expr>", err.span, expr.body.clone(), content));
                ShellError::Syntax(err)
            })
    }

    /// Realize a deferred value: dereference a variable, evaluate an
    /// expression or run a block. Concrete values pass through.
    pub fn force(&mut self, value: &Value) -> Result<Value, ShellError> {
        match value {
            Value::Variable(name) => Ok(self.context.get(name).unwrap_or(Value::None)),
            Value::Expression(expr) => self.eval_expression(expr),
            Value::Block(block) => self.eval_block(block),
            other => Ok(other.clone()),
        }
    }

    fn run_host(&mut self, command: &str) -> Result<Value, ShellError> {
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|err| ShellError::Handler {
                command: "!".to_string(),
                message: err.to_string(),
            })?;
        Ok(Value::Int(status.code().unwrap_or(-1).to_string()))
    }

    /// Render an error together with the diagnostic stack that was live
    /// when it was raised, innermost frame first.
    pub fn render_error(&self, error: &ShellError) -> String {
        let mut out = self.trace.render();
        out.push_str(&format!("Exception: {} {}\n", error.kind_name(), error));
        if let ShellError::NoMatchingOverload { causes, .. } = error {
            for cause in causes {
                out.push_str(&format!("  - {}: {}\n", cause.kind.name(), cause));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{BoundArgs, Command, HandlerError, ParamType, Parameter};

    fn test_shell() -> Shell {
        let mut shell = Shell::new("test");
        shell.add_command(
            Command::new("echo").signature(
                vec![Parameter::required("val", ParamType::Any)],
                |interp, args: &BoundArgs| {
                    let val = args.value("val");
                    if val.is_deferred() {
                        // Deferred values reaching an Any parameter stay
                        // deferred; echo realizes them for convenience.
                        return interp
                            .force(&val)
                            .map_err(|e| HandlerError::new(e.to_string()));
                    }
                    Ok(val)
                },
            ),
        );
        shell.add_command(
            Command::new("var").signature(
                vec![
                    Parameter::required("var", ParamType::Variable),
                    Parameter::optional("val", ParamType::Any, Value::None),
                ],
                |interp, args: &BoundArgs| {
                    let Value::Variable(name) = args.value("var") else {
                        return Err(HandlerError::new("expected a variable"));
                    };
                    let val = args.value("val");
                    if val != Value::None {
                        interp.context_mut().set(name.clone(), val);
                    }
                    Ok(interp.context().get(&name).unwrap_or(Value::None))
                },
            ),
        );
        shell.add_command(
            Command::new("fail").signature(Vec::<Parameter>::new(), |_, _: &BoundArgs| {
                Err(HandlerError::new("boom"))
            }),
        );
        shell
    }

    fn interp() -> Interpreter {
        Interpreter::new(test_shell())
    }

    #[test]
    fn test_eval_simple() {
        let mut interp = interp();
        assert_eq!(interp.eval("echo 3").unwrap(), Value::Int("3".into()));
        assert_eq!(interp.context().last(), Some(&Value::Int("3".into())));
        assert_eq!(interp.context().out().len(), 1);
    }

    #[test]
    fn test_comment_returns_none_without_recording() {
        let mut interp = interp();
        assert_eq!(interp.eval("# just a note").unwrap(), Value::None);
        assert_eq!(interp.context().last(), None);
        assert!(interp.context().out().is_empty());
    }

    #[test]
    fn test_var_assignment_roundtrip() {
        let mut interp = interp();
        assert_eq!(interp.eval("$x = 7").unwrap(), Value::Int("7".into()));
        assert_eq!(interp.eval("echo $x").unwrap(), Value::Int("7".into()));
    }

    #[test]
    fn test_var_from_command() {
        let mut interp = interp();
        interp.eval("$x : echo 5").unwrap();
        assert_eq!(interp.context().get("x"), Some(Value::Int("5".into())));
    }

    #[test]
    fn test_bare_var_reads() {
        let mut interp = interp();
        interp.eval("$x = 7").unwrap();
        assert_eq!(interp.eval("$x").unwrap(), Value::Int("7".into()));
    }

    #[test]
    fn test_no_such_command() {
        let mut interp = interp();
        let err = interp.eval("unknown.path").unwrap_err();
        assert!(matches!(err, ShellError::NoSuchCommand(path) if path == "unknown.path"));
        assert_eq!(interp.context().last(), None);
    }

    #[test]
    fn test_failed_line_leaves_context() {
        let mut interp = interp();
        interp.eval("echo 1").unwrap();
        let before = interp.context().out().len();
        assert!(interp.eval("echo 'unterminated").is_err());
        assert_eq!(interp.context().out().len(), before);
        assert_eq!(interp.context().last(), Some(&Value::Int("1".into())));
    }

    #[test]
    fn test_handler_error_wrapped() {
        let mut interp = interp();
        let err = interp.eval("fail").unwrap_err();
        match err {
            ShellError::Handler { command, message } => {
                assert_eq!(command, "fail");
                assert_eq!(message, "boom");
            }
            other => panic!("expected handler error, got {:?}", other),
        }
        let rendered = interp.render_error(&ShellError::Handler {
            command: "fail".into(),
            message: "boom".into(),
        });
        assert!(rendered.contains("Exception: HandlerError"));
    }

    #[test]
    fn test_eval_block_last_value_wins() {
        let mut interp = interp();
        let block = Block {
            commands: vec!["echo 1".into(), "echo 2".into()],
            auto_evaluate: false,
        };
        assert_eq!(interp.eval_block(&block).unwrap(), Value::Int("2".into()));
        // Inner evaluations do not touch the result history.
        assert!(interp.context().out().is_empty());
    }

    #[test]
    fn test_unknown_expression_prefix() {
        let mut interp = interp();
        let expr = Expression {
            prefix: Some("nope".into()),
            body: "1".into(),
            auto_evaluate: false,
        };
        let err = interp.eval_expression(&expr).unwrap_err();
        assert!(matches!(err, ShellError::Syntax(_)));
        assert!(interp.trace().frames().iter().any(|f| f.file == "<expr>"));
    }

    #[test]
    fn test_force() {
        let mut interp = interp();
        interp.context_mut().set("x", Value::Int("9".into()));
        assert_eq!(
            interp.force(&Value::Variable("x".into())).unwrap(),
            Value::Int("9".into())
        );
        assert_eq!(
            interp.force(&Value::Variable("missing".into())).unwrap(),
            Value::None
        );
        assert_eq!(
            interp.force(&Value::Int("3".into())).unwrap(),
            Value::Int("3".into())
        );
    }

    #[test]
    fn test_stop() {
        let mut interp = interp();
        assert!(interp.is_running());
        interp.stop();
        assert!(!interp.is_running());
    }
}
