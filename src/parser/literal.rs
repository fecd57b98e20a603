//! Literal Parser
//!
//! Converts one raw argument token into a typed [`Value`]. Dispatch is by
//! first character and exact-text tests, in this order: the fixed
//! singletons, registered words, variables, numbers, strings, paths,
//! bracketed lists/maps, slices, points, expressions, command blocks.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::diagnostics::{Frame, Span, StackTrace};
use crate::value::{Block, Expression, Value, WordSet};

use super::tokenizer::{group, Tokenizer};
use super::types::{Arguments, SyntaxError, Token};

lazy_static! {
    /// Variable and word names.
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    /// Expression prefixes must start with a letter.
    static ref PREFIX_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    /// Decimal literals: digits with a dot and/or an exponent.
    static ref DEC_RE: Regex =
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap();
    /// `$VAR` and `%VAR%` references inside path literals.
    static ref ENV_REF_RE: Regex =
        Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

const DEC_CHARS: &str = "0123456789.eE+-";
const SLICE_CHARS: &str = "0123456789:-";
const POINT_CHARS: &str = "0123456789,.-";

fn chars_subset(s: &str, allowed: &str) -> bool {
    s.chars().all(|c| allowed.contains(c))
}

fn is_int_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn is_dec_candidate(s: &str) -> bool {
    chars_subset(s, DEC_CHARS) && s.contains(['.', 'e', 'E'])
}

/// Expand `$VAR` and `%VAR%` references textually; unknown variables are
/// left as written.
pub fn expand_env(text: &str) -> String {
    ENV_REF_RE
        .replace_all(text, |caps: &regex_lite::Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

fn fail(
    trace: &mut StackTrace,
    line: &str,
    span: Span,
    content: &str,
    message: impl Into<String>,
) -> SyntaxError {
    trace.push(Frame::new("<literal>", span, line, content));
    SyntaxError::new(message, span)
}

/// Parse a single token into a value.
pub fn parse_literal(
    token: &Token,
    words: &WordSet,
    line: &str,
    trace: &mut StackTrace,
) -> Result<Value, SyntaxError> {
    let text = token.text.as_str();
    let span = token.span();

    match text {
        "True" => return Ok(Value::Bool(true)),
        "False" => return Ok(Value::Bool(false)),
        "Nil" => return Ok(Value::Nil),
        "None" => return Ok(Value::None),
        _ => {}
    }

    if words.contains(text) {
        return Ok(Value::Word(text.to_string()));
    }

    if let Some(name) = text.strip_prefix('$') {
        if !NAME_RE.is_match(name) {
            return Err(fail(
                trace,
                line,
                span,
                text,
                format!("invalid variable name '{}'", name),
            ));
        }
        return Ok(Value::Variable(name.to_string()));
    }

    if is_int_literal(text) {
        return Ok(Value::Int(text.to_string()));
    }

    if is_dec_candidate(text) {
        if DEC_RE.is_match(text) {
            return Ok(Value::Dec(text.to_string()));
        }
        return Err(fail(
            trace,
            line,
            span,
            text,
            format!("malformed decimal literal '{}'", text),
        ));
    }

    if text.starts_with('\'') || text.starts_with('"') {
        return parse_string(token, line, trace);
    }

    if text.len() >= 2 && text.starts_with('/') && text.ends_with('/') {
        let interior = &text[1..text.len() - 1];
        return Ok(Value::Path(expand_env(interior)));
    }

    if text.starts_with('[') && text.ends_with(']') {
        return parse_bracketed(token, words, line, trace);
    }

    if text.contains(':') && chars_subset(text, SLICE_CHARS) {
        return parse_slice(token, line, trace);
    }

    if text.contains(',') && chars_subset(text, POINT_CHARS) {
        return parse_point(token, line, trace);
    }

    if text.len() >= 2 && text.starts_with('(') && text.ends_with(')') {
        return Ok(parse_expression(text));
    }

    if text.len() >= 2 && text.starts_with('{') && text.ends_with('}') {
        return Ok(parse_block(text));
    }

    Err(fail(
        trace,
        line,
        span,
        text,
        format!("unrecognised literal '{}'", text),
    ))
}

fn parse_string(
    token: &Token,
    line: &str,
    trace: &mut StackTrace,
) -> Result<Value, SyntaxError> {
    let text = token.text.as_str();
    let span = token.span();
    let quote = text.chars().next().unwrap_or('\'');

    if text.len() < 2 || !text.ends_with(quote) {
        return Err(fail(trace, line, span, text, "unterminated string literal"));
    }

    let interior = &text[1..text.len() - 1];
    let mut decoded = String::with_capacity(interior.len());
    let mut chars = interior.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if matches!(next, '\\' | '\'' | '"') => decoded.push(next),
                Some(next) => {
                    return Err(fail(
                        trace,
                        line,
                        span,
                        text,
                        format!("unknown escape '\\{}'", next),
                    ));
                }
                None => {
                    return Err(fail(
                        trace,
                        line,
                        span,
                        text,
                        "escaped nothing at end of string",
                    ));
                }
            }
        } else {
            decoded.push(c);
        }
    }
    Ok(Value::Str(decoded))
}

fn parse_bracketed(
    token: &Token,
    words: &WordSet,
    line: &str,
    trace: &mut StackTrace,
) -> Result<Value, SyntaxError> {
    let text = token.text.as_str();

    if text == "[]" {
        return Ok(Value::List(Vec::new()));
    }
    if text == "[-]" {
        return Ok(Value::Map(IndexMap::new()));
    }

    let interior = &text[1..text.len() - 1];
    let args = parse_arguments(interior, token.offset + 1, line, words, trace)?;

    if args.keyword.is_empty() {
        Ok(Value::List(
            args.positional.into_iter().map(|(v, _)| v).collect(),
        ))
    } else {
        Ok(Value::Map(
            args.keyword.into_iter().map(|(k, (v, _))| (k, v)).collect(),
        ))
    }
}

fn parse_slice(
    token: &Token,
    line: &str,
    trace: &mut StackTrace,
) -> Result<Value, SyntaxError> {
    let text = token.text.as_str();
    let parts: Vec<&str> = text.split(':').collect();

    if parts.len() < 2 || parts.len() > 3 {
        return Err(fail(
            trace,
            line,
            token.span(),
            text,
            format!("wrong slice '{}'", text),
        ));
    }

    let mut bounds = [None, None, None];
    let mut offset = token.offset;
    for (i, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            let part_span = Span::new(offset, offset + part.len());
            bounds[i] = Some(part.parse::<i64>().map_err(|_| {
                fail(
                    trace,
                    line,
                    part_span,
                    part,
                    format!("wrong slice '{}'", text),
                )
            })?);
        }
        offset += part.len() + 1;
    }

    let [start, stop, step] = bounds;
    Ok(Value::Slice(start, stop, step))
}

fn parse_point(
    token: &Token,
    line: &str,
    trace: &mut StackTrace,
) -> Result<Value, SyntaxError> {
    let text = token.text.as_str();
    let mut parts = Vec::new();
    let mut offset = token.offset;

    for part in text.split(',') {
        let part_span = Span::new(offset, offset + part.len());
        if !is_int_literal(part) && !DEC_RE.is_match(part) {
            return Err(fail(
                trace,
                line,
                part_span,
                part,
                format!("invalid point coordinate '{}'", part),
            ));
        }
        parts.push(part.to_string());
        offset += part.len() + 1;
    }

    Ok(Value::Point(parts))
}

fn parse_expression(text: &str) -> Value {
    let interior = &text[1..text.len() - 1];

    let (prefix, body) = match interior.find('#') {
        Some(idx) if PREFIX_RE.is_match(&interior[..idx]) => {
            (Some(interior[..idx].to_string()), &interior[idx + 1..])
        }
        _ => (None, interior),
    };

    let (body, auto_evaluate) =
        if body.len() >= 2 && body.starts_with('(') && body.ends_with(')') {
            (&body[1..body.len() - 1], true)
        } else {
            (body, false)
        };

    Value::Expression(Expression {
        prefix,
        body: body.to_string(),
        auto_evaluate,
    })
}

fn parse_block(text: &str) -> Value {
    let mut interior = &text[1..text.len() - 1];

    let auto_evaluate =
        interior.len() >= 2 && interior.starts_with('{') && interior.ends_with('}');
    if auto_evaluate {
        interior = &interior[1..interior.len() - 1];
    }

    let mut commands = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in interior.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                commands.push(interior[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    commands.push(interior[start..].trim().to_string());
    commands.retain(|c| !c.is_empty());

    Value::Block(Block { commands, auto_evaluate })
}

/// Tokenize, group and literal-parse the argument text of a command call.
///
/// `origin` is the byte offset of `text` within `line`; all spans in the
/// result are relative to `line`.
pub fn parse_arguments(
    text: &str,
    origin: usize,
    line: &str,
    words: &WordSet,
    trace: &mut StackTrace,
) -> Result<Arguments, SyntaxError> {
    let tokens = Tokenizer::new(text, origin, line).tokenize(trace)?;
    let grouped = group(tokens);

    let mut args = Arguments::empty(line);

    for token in &grouped.positional {
        let value = parse_literal(token, words, line, trace)?;
        args.positional.push((value, token.span()));
    }

    for slot in &grouped.keyword {
        let (value, span) = match &slot.value {
            Some(token) => (parse_literal(token, words, line, trace)?, token.span()),
            None => (
                Value::Nil,
                Span::new(slot.flag_offset, slot.flag_offset + slot.name.len() + 1),
            ),
        };
        args.keyword.insert(slot.name.clone(), (value, span));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        parse_literal(&Token::new(0, text), &words, text, &mut trace).unwrap()
    }

    fn parse_err(text: &str) -> SyntaxError {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        parse_literal(&Token::new(0, text), &words, text, &mut trace).unwrap_err()
    }

    #[test]
    fn test_singletons() {
        assert_eq!(parse("True"), Value::Bool(true));
        assert_eq!(parse("False"), Value::Bool(false));
        assert_eq!(parse("Nil"), Value::Nil);
        assert_eq!(parse("None"), Value::None);
    }

    #[test]
    fn test_registered_word() {
        assert_eq!(parse("as"), Value::Word("as".into()));
        assert_eq!(parse("else"), Value::Word("else".into()));
    }

    #[test]
    fn test_unregistered_name_fails() {
        let err = parse_err("frobnicate");
        assert!(err.message.contains("unrecognised literal"));
    }

    #[test]
    fn test_variable() {
        assert_eq!(parse("$x"), Value::Variable("x".into()));
        assert_eq!(parse("$long_name2"), Value::Variable("long_name2".into()));
        assert!(parse_err("$2x").message.contains("invalid variable name"));
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse("3"), Value::Int("3".into()));
        assert_eq!(parse("-42"), Value::Int("-42".into()));
        assert_eq!(parse("007"), Value::Int("007".into()));
    }

    #[test]
    fn test_decimals() {
        assert_eq!(parse("3.5"), Value::Dec("3.5".into()));
        assert_eq!(parse("-0.5"), Value::Dec("-0.5".into()));
        assert_eq!(parse("1e5"), Value::Dec("1e5".into()));
        assert_eq!(parse("2.5e-3"), Value::Dec("2.5e-3".into()));
        assert!(parse_err("1.2.3").message.contains("malformed decimal"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse("'abc'"), Value::Str("abc".into()));
        assert_eq!(parse("\"a b\""), Value::Str("a b".into()));
        assert_eq!(parse(r"'5.4\'r'"), Value::Str("5.4'r".into()));
        assert_eq!(parse(r#"'a\\b'"#), Value::Str(r"a\b".into()));
    }

    #[test]
    fn test_path() {
        assert_eq!(parse("/C:/ama/"), Value::Path("C:/ama".into()));
    }

    #[test]
    fn test_path_env_expansion() {
        std::env::set_var("SHELLSY_TEST_HOME", "/home/tester");
        assert_eq!(
            parse("/%SHELLSY_TEST_HOME%/docs/"),
            Value::Path("/home/tester/docs".into())
        );
        assert_eq!(
            parse("/$SHELLSY_TEST_HOME/docs/"),
            Value::Path("/home/tester/docs".into())
        );
        // Unknown variables are left as written.
        assert_eq!(
            parse("/%SHELLSY_NO_SUCH_VAR%/x/"),
            Value::Path("%SHELLSY_NO_SUCH_VAR%/x".into())
        );
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(parse("[]"), Value::List(vec![]));
        assert_eq!(parse("[-]"), Value::Map(IndexMap::new()));
    }

    #[test]
    fn test_nested_list() {
        let value = parse("[1 2 [3] [] [-] [-a 3 -b 5]]");
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Int("3".into()));
        map.insert("b".to_string(), Value::Int("5".into()));
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int("1".into()),
                Value::Int("2".into()),
                Value::List(vec![Value::Int("3".into())]),
                Value::List(vec![]),
                Value::Map(IndexMap::new()),
                Value::Map(map),
            ])
        );
    }

    #[test]
    fn test_map_flag_without_value() {
        let value = parse("[-a -b 5]");
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Nil);
        map.insert("b".to_string(), Value::Int("5".into()));
        assert_eq!(value, Value::Map(map));
    }

    #[test]
    fn test_slices() {
        assert_eq!(parse("1:5:2"), Value::Slice(Some(1), Some(5), Some(2)));
        assert_eq!(parse("1:5"), Value::Slice(Some(1), Some(5), None));
        assert_eq!(parse(":5"), Value::Slice(None, Some(5), None));
        assert_eq!(parse("1:"), Value::Slice(Some(1), None, None));
        assert_eq!(parse("::2"), Value::Slice(None, None, Some(2)));
        assert_eq!(parse("-3:-1"), Value::Slice(Some(-3), Some(-1), None));
    }

    #[test]
    fn test_wrong_slice() {
        assert!(parse_err("1:2:3:4").message.contains("wrong slice"));
        assert!(parse_err("1:2-3").message.contains("wrong slice"));
    }

    #[test]
    fn test_points() {
        assert_eq!(parse("1,2"), Value::Point(vec!["1".into(), "2".into()]));
        assert_eq!(
            parse("1.5,-2.25,3"),
            Value::Point(vec!["1.5".into(), "-2.25".into(), "3".into()])
        );
        assert!(parse_err("1,2,").message.contains("invalid point"));
    }

    #[test]
    fn test_expression_default_prefix() {
        assert_eq!(
            parse("(1 + 2)"),
            Value::Expression(Expression {
                prefix: None,
                body: "1 + 2".into(),
                auto_evaluate: false,
            })
        );
    }

    #[test]
    fn test_expression_with_prefix() {
        assert_eq!(
            parse("(py#x > 5)"),
            Value::Expression(Expression {
                prefix: Some("py".into()),
                body: "x > 5".into(),
                auto_evaluate: false,
            })
        );
    }

    #[test]
    fn test_expression_prefix_must_be_a_name() {
        // The body starting with '(' must not shift the prefix split.
        assert_eq!(
            parse("((a#b))"),
            Value::Expression(Expression {
                prefix: None,
                body: "a#b".into(),
                auto_evaluate: true,
            })
        );
    }

    #[test]
    fn test_expression_auto_evaluate() {
        assert_eq!(
            parse("((x > 5))"),
            Value::Expression(Expression {
                prefix: None,
                body: "x > 5".into(),
                auto_evaluate: true,
            })
        );
        assert_eq!(
            parse("(py#(x))"),
            Value::Expression(Expression {
                prefix: Some("py".into()),
                body: "x".into(),
                auto_evaluate: true,
            })
        );
    }

    #[test]
    fn test_block() {
        assert_eq!(
            parse("{echo 1; echo 2}"),
            Value::Block(Block {
                commands: vec!["echo 1".into(), "echo 2".into()],
                auto_evaluate: false,
            })
        );
    }

    #[test]
    fn test_block_nested_braces() {
        assert_eq!(
            parse("{if (1) {echo 1; echo 2}; echo 3}"),
            Value::Block(Block {
                commands: vec!["if (1) {echo 1; echo 2}".into(), "echo 3".into()],
                auto_evaluate: false,
            })
        );
    }

    #[test]
    fn test_block_auto_evaluate() {
        assert_eq!(
            parse("{{echo 1}}"),
            Value::Block(Block {
                commands: vec!["echo 1".into()],
                auto_evaluate: true,
            })
        );
    }

    #[test]
    fn test_parse_arguments_keywords() {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        let args = parse_arguments("-n 3 5", 0, "-n 3 5", &words, &mut trace).unwrap();
        assert_eq!(args.positional.len(), 1);
        assert_eq!(args.positional[0].0, Value::Int("5".into()));
        assert_eq!(args.keyword.get("n").unwrap().0, Value::Int("3".into()));
    }

    #[test]
    fn test_parse_arguments_flag_nil() {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        let args = parse_arguments("-k -j 3", 0, "-k -j 3", &words, &mut trace).unwrap();
        assert_eq!(args.keyword.get("k").unwrap().0, Value::Nil);
        assert_eq!(args.keyword.get("j").unwrap().0, Value::Int("3".into()));
    }

    #[test]
    fn test_error_leaves_frame() {
        let words = WordSet::with_defaults();
        let mut trace = StackTrace::new();
        let result =
            parse_literal(&Token::new(0, "frob"), &words, "frob", &mut trace);
        assert!(result.is_err());
        assert_eq!(trace.frames().len(), 1);
        assert_eq!(trace.frames()[0].file, "<literal>");
    }
}
