//! Round-trip formatting for values.
//!
//! For every non-deferred value, the printed form parses back to a
//! structurally equal value.

use std::fmt;

use super::types::{Block, Expression, Value};

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

fn write_slice_part(f: &mut fmt::Formatter<'_>, part: &Option<i64>) -> fmt::Result {
    match part {
        Some(n) => write!(f, "{}", n),
        None => Ok(()),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = if self.auto_evaluate {
            format!("({})", self.body)
        } else {
            self.body.clone()
        };
        match &self.prefix {
            Some(prefix) => write!(f, "({}#{})", prefix, body),
            None => write!(f, "({})", body),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.commands.join("; ");
        if self.auto_evaluate {
            write!(f, "{{{{{}}}}}", inner)
        } else {
            write!(f, "{{{}}}", inner)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(text) | Value::Dec(text) => f.write_str(text),
            Value::Str(s) => write_quoted(f, s),
            Value::Path(p) => write!(f, "/{}/", p),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Nil => f.write_str("Nil"),
            Value::None => f.write_str("None"),
            Value::Slice(start, stop, step) => {
                write_slice_part(f, start)?;
                f.write_str(":")?;
                write_slice_part(f, stop)?;
                if step.is_some() {
                    f.write_str(":")?;
                    write_slice_part(f, step)?;
                }
                Ok(())
            }
            Value::Point(parts) => f.write_str(&parts.join(",")),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                if entries.is_empty() {
                    return f.write_str("[-]");
                }
                f.write_str("[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "-{} {}", key, value)?;
                }
                f.write_str("]")
            }
            Value::Word(name) => f.write_str(name),
            Value::Variable(name) => write!(f, "${}", name),
            Value::Expression(expr) => write!(f, "{}", expr),
            Value::Block(block) => write!(f, "{}", block),
        }
    }
}
