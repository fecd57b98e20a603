//! Command Call Parser
//!
//! Splits one input line into its top-level form: a comment, a host-shell
//! passthrough, a `$name` variable form, or a command call (dotted path
//! plus argument text).

use crate::diagnostics::{Frame, Span, StackTrace};
use crate::value::{Value, WordSet};

use super::literal::parse_arguments;
use super::types::{CommandCall, SyntaxError};

/// The right-hand side of a `$name` variable form.
#[derive(Debug, Clone, PartialEq)]
pub enum VarRhs {
    /// `$name` — read the variable.
    Bare,
    /// `$name = <literal>` — assign a parsed literal.
    Literal(Value, Span),
    /// `$name : <command-line>` — assign the result of a command,
    /// interpreted recursively. Carries the raw text and its offset.
    Command(String, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarForm {
    pub name: String,
    pub name_span: Span,
    pub rhs: VarRhs,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank line or `#` comment.
    Empty,
    /// `!…` host-shell passthrough.
    Host(String),
    /// `$name`, `$name = literal` or `$name : command`.
    VarForm(VarForm),
    Call(CommandCall),
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Parse one input line.
pub fn parse_line(
    line: &str,
    words: &WordSet,
    trace: &mut StackTrace,
) -> Result<ParsedLine, SyntaxError> {
    let stripped = line.trim_end();
    let body = stripped.trim_start();
    let base = stripped.len() - body.len();

    if body.is_empty() || body.starts_with('#') {
        return Ok(ParsedLine::Empty);
    }

    if let Some(rest) = body.strip_prefix('!') {
        return Ok(ParsedLine::Host(rest.trim().to_string()));
    }

    if body.starts_with('$') {
        return parse_var_form(line, body, base, words, trace);
    }

    let path_len = body
        .char_indices()
        .find(|&(_, c)| !is_path_char(c))
        .map(|(i, _)| i)
        .unwrap_or(body.len());

    if path_len == 0 {
        let span = Span::new(base, base + 1);
        trace.push(Frame::new("<command>", span, line, &body[..1]));
        return Err(SyntaxError::new("expected a command name", span));
    }

    let path = &body[..path_len];
    let path_span = Span::new(base, base + path_len);

    let remainder = &body[path_len..];
    let arg_text = remainder.trim_start();
    let arg_origin = base + path_len + (remainder.len() - arg_text.len());
    let arguments = parse_arguments(arg_text, arg_origin, line, words, trace)?;

    Ok(ParsedLine::Call(CommandCall {
        path: path.to_string(),
        path_span,
        arguments,
    }))
}

fn parse_var_form(
    line: &str,
    body: &str,
    base: usize,
    words: &WordSet,
    trace: &mut StackTrace,
) -> Result<ParsedLine, SyntaxError> {
    let after_dollar = &body[1..];
    let name_len = after_dollar
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(after_dollar.len());
    let name = &after_dollar[..name_len];
    let name_span = Span::new(base, base + 1 + name_len);

    if name.is_empty() || !name.starts_with(is_name_start) {
        trace.push(Frame::new("<command>", name_span, line, &body[..1 + name_len]));
        return Err(SyntaxError::new(
            format!("invalid variable name '{}'", name),
            name_span,
        ));
    }

    let rest = &after_dollar[name_len..];
    let rest_trimmed = rest.trim_start();
    let rest_offset = base + 1 + name_len + (rest.len() - rest_trimmed.len());

    let rhs = if rest_trimmed.is_empty() {
        VarRhs::Bare
    } else if let Some(rhs_text) = rest_trimmed.strip_prefix('=') {
        let literal_text = rhs_text.trim_start();
        let literal_offset = rest_offset + 1 + (rhs_text.len() - literal_text.len());
        let args = parse_arguments(literal_text, literal_offset, line, words, trace)?;
        if !args.keyword.is_empty() || args.positional.len() != 1 {
            let span = Span::new(literal_offset, literal_offset + literal_text.len());
            trace.push(Frame::new("<argument>", span, line, literal_text));
            return Err(SyntaxError::new("expected a single literal", span));
        }
        let (value, span) = args.positional.into_iter().next().unwrap_or((Value::None, name_span));
        VarRhs::Literal(value, span)
    } else if let Some(rhs_text) = rest_trimmed.strip_prefix(':') {
        let command_text = rhs_text.trim();
        if command_text.is_empty() {
            let span = Span::new(rest_offset, rest_offset + 1);
            trace.push(Frame::new("<command>", span, line, ":"));
            return Err(SyntaxError::new("expected a command after ':'", span));
        }
        let command_offset = rest_offset + 1 + (rhs_text.len() - rhs_text.trim_start().len());
        VarRhs::Command(command_text.to_string(), command_offset)
    } else {
        let span = Span::new(rest_offset, rest_offset + 1);
        trace.push(Frame::new("<command>", span, line, rest_trimmed));
        return Err(SyntaxError::new(
            "expected '=' or ':' after variable",
            span,
        ));
    };

    Ok(ParsedLine::VarForm(VarForm {
        name: name.to_string(),
        name_span,
        rhs,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ParsedLine {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        parse_line(line, &words, &mut trace).unwrap()
    }

    fn parse_err(line: &str) -> SyntaxError {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        parse_line(line, &words, &mut trace).unwrap_err()
    }

    #[test]
    fn test_blank_and_comment() {
        assert_eq!(parse(""), ParsedLine::Empty);
        assert_eq!(parse("   "), ParsedLine::Empty);
        assert_eq!(parse("# a comment"), ParsedLine::Empty);
        assert_eq!(parse("   # indented"), ParsedLine::Empty);
    }

    #[test]
    fn test_host_passthrough() {
        assert_eq!(parse("!ls -la"), ParsedLine::Host("ls -la".into()));
    }

    #[test]
    fn test_simple_call() {
        match parse("echo 3") {
            ParsedLine::Call(call) => {
                assert_eq!(call.path, "echo");
                assert_eq!(call.path_span, Span::new(0, 4));
                assert_eq!(call.arguments.positional.len(), 1);
                assert_eq!(call.arguments.positional[0].0, Value::Int("3".into()));
                assert_eq!(call.arguments.positional[0].1, Span::new(5, 6));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_path() {
        match parse("word.add also") {
            ParsedLine::Call(call) => {
                assert_eq!(call.path, "word.add");
                assert_eq!(call.arguments.positional.len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_without_arguments() {
        match parse("exit") {
            ParsedLine::Call(call) => {
                assert_eq!(call.path, "exit");
                assert!(call.arguments.is_empty());
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_var_bare() {
        assert_eq!(
            parse("$x"),
            ParsedLine::VarForm(VarForm {
                name: "x".into(),
                name_span: Span::new(0, 2),
                rhs: VarRhs::Bare,
            })
        );
    }

    #[test]
    fn test_var_assign_literal() {
        match parse("$x = 7") {
            ParsedLine::VarForm(form) => {
                assert_eq!(form.name, "x");
                assert_eq!(form.rhs, VarRhs::Literal(Value::Int("7".into()), Span::new(5, 6)));
            }
            other => panic!("expected var form, got {:?}", other),
        }
    }

    #[test]
    fn test_var_assign_list_literal() {
        match parse("$xs = [1 2 3]") {
            ParsedLine::VarForm(form) => match form.rhs {
                VarRhs::Literal(Value::List(items), _) => assert_eq!(items.len(), 3),
                other => panic!("expected list literal, got {:?}", other),
            },
            other => panic!("expected var form, got {:?}", other),
        }
    }

    #[test]
    fn test_var_assign_command() {
        match parse("$x : echo 5") {
            ParsedLine::VarForm(form) => {
                assert_eq!(form.rhs, VarRhs::Command("echo 5".into(), 5));
            }
            other => panic!("expected var form, got {:?}", other),
        }
    }

    #[test]
    fn test_var_form_errors() {
        assert!(parse_err("$x = 1 2").message.contains("single literal"));
        assert!(parse_err("$x :").message.contains("expected a command"));
        assert!(parse_err("$x 5").message.contains("expected '='"));
        assert!(parse_err("$2x = 1").message.contains("invalid variable name"));
    }

    #[test]
    fn test_expected_command_name() {
        assert!(parse_err("-n 3").message.contains("expected a command name"));
    }

    #[test]
    fn test_argument_spans_absolute() {
        match parse("  echo   'a b'") {
            ParsedLine::Call(call) => {
                let (_, span) = &call.arguments.positional[0];
                assert_eq!(&"  echo   'a b'"[span.begin..span.end], "'a b'");
            }
            other => panic!("expected call, got {:?}", other),
        }
    }
}
