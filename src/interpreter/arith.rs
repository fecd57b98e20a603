//! Arithmetic Expression Evaluator
//!
//! The evaluator the default prefix points at in the shipped shell:
//! integers, decimals, variables, `+ - * / %`, comparisons, `&& || !` and
//! parentheses, with C-like precedence. Variables resolve against the
//! session context, written either `$name` or bare `name`.

use crate::diagnostics::Span;
use crate::parser::SyntaxError;
use crate::value::Value;

use super::context::Context;
use super::evaluators::ExpressionEvaluator;

pub struct ArithEvaluator;

impl ExpressionEvaluator for ArithEvaluator {
    fn evaluate(&self, context: &mut Context, body: &str) -> Result<Value, SyntaxError> {
        let mut parser = ArithParser::new(body, context);
        let result = parser.parse_or()?;
        parser.skip_whitespace();
        if let Some((offset, _)) = parser.current() {
            return Err(SyntaxError::new(
                format!("unexpected token '{}'", &body[offset..]),
                Span::new(offset, body.len()),
            ));
        }
        Ok(result.into_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Dec(f64),
    Bool(bool),
}

impl Num {
    fn truthy(self) -> bool {
        match self {
            Num::Int(n) => n != 0,
            Num::Dec(d) => d != 0.0,
            Num::Bool(b) => b,
        }
    }

    fn as_dec(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Dec(d) => d,
            Num::Bool(b) => b as i64 as f64,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n.to_string()),
            Num::Dec(d) => Value::Dec(d.to_string()),
            Num::Bool(b) => Value::Bool(b),
        }
    }
}

struct ArithParser<'a> {
    body: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    context: &'a Context,
}

impl<'a> ArithParser<'a> {
    fn new(body: &'a str, context: &'a Context) -> Self {
        Self {
            body,
            chars: body.char_indices().collect(),
            pos: 0,
            context,
        }
    }

    fn current(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(_, c)| c)
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some((_, c)) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn byte_offset(&self) -> usize {
        self.current().map(|(b, _)| b).unwrap_or(self.body.len())
    }

    /// Consume `op` if it is next, skipping leading whitespace.
    fn eat(&mut self, op: &str) -> bool {
        self.skip_whitespace();
        let mut count = 0;
        for expected in op.chars() {
            if self.peek_char(count) != Some(expected) {
                return false;
            }
            count += 1;
        }
        // `<` must not swallow the start of `<=`; the caller tries the
        // longer operator first.
        for _ in 0..count {
            self.advance();
        }
        true
    }

    fn parse_or(&mut self) -> Result<Num, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.eat("||") {
            let right = self.parse_and()?;
            left = Num::Bool(left.truthy() || right.truthy());
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Num, SyntaxError> {
        let mut left = self.parse_comparison()?;
        while self.eat("&&") {
            let right = self.parse_comparison()?;
            left = Num::Bool(left.truthy() && right.truthy());
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Num, SyntaxError> {
        let left = self.parse_additive()?;
        for op in ["==", "!=", "<=", ">=", "<", ">"] {
            if self.eat(op) {
                let right = self.parse_additive()?;
                let (l, r) = (left.as_dec(), right.as_dec());
                let result = match op {
                    "==" => l == r,
                    "!=" => l != r,
                    "<=" => l <= r,
                    ">=" => l >= r,
                    "<" => l < r,
                    _ => l > r,
                };
                return Ok(Num::Bool(result));
            }
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Num, SyntaxError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            if self.eat("+") {
                let right = self.parse_multiplicative()?;
                left = numeric_op(left, right, |a, b| a + b, i64::checked_add);
            } else if self.peek_minus() {
                self.eat("-");
                let right = self.parse_multiplicative()?;
                left = numeric_op(left, right, |a, b| a - b, i64::checked_sub);
            } else {
                return Ok(left);
            }
        }
    }

    /// A `-` is a binary operator here only; unary minus is handled by
    /// the unary level.
    fn peek_minus(&mut self) -> bool {
        self.skip_whitespace();
        matches!(self.current(), Some((_, '-')))
    }

    fn parse_multiplicative(&mut self) -> Result<Num, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.eat("*") {
                let right = self.parse_unary()?;
                left = numeric_op(left, right, |a, b| a * b, i64::checked_mul);
            } else if self.eat("%") {
                let offset = self.byte_offset();
                let right = self.parse_unary()?;
                left = divide(left, right, offset, true)?;
            } else if self.eat("/") {
                let offset = self.byte_offset();
                let right = self.parse_unary()?;
                left = divide(left, right, offset, false)?;
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Num, SyntaxError> {
        self.skip_whitespace();
        if self.eat("!") {
            let operand = self.parse_unary()?;
            return Ok(Num::Bool(!operand.truthy()));
        }
        if matches!(self.current(), Some((_, '-'))) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(match operand {
                Num::Int(n) => Num::Int(-n),
                Num::Dec(d) => Num::Dec(-d),
                Num::Bool(b) => Num::Int(-(b as i64)),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Num, SyntaxError> {
        self.skip_whitespace();
        let Some((begin, c)) = self.current() else {
            return Err(SyntaxError::new(
                "operand expected",
                Span::new(self.body.len(), self.body.len()),
            ));
        };

        if c == '(' {
            self.advance();
            let inner = self.parse_or()?;
            self.skip_whitespace();
            if !self.eat(")") {
                return Err(SyntaxError::new(
                    "expected ')'",
                    Span::new(self.byte_offset(), self.byte_offset() + 1),
                ));
            }
            return Ok(inner);
        }

        if c.is_ascii_digit() || c == '.' {
            return self.parse_number(begin);
        }

        if c == '$' || c.is_ascii_alphabetic() || c == '_' {
            return self.parse_variable(begin, c == '$');
        }

        Err(SyntaxError::new(
            format!("unexpected character '{}'", c),
            Span::new(begin, begin + c.len_utf8()),
        ))
    }

    fn parse_number(&mut self, begin: usize) -> Result<Num, SyntaxError> {
        let mut is_dec = false;
        while let Some((_, c)) = self.current() {
            match c {
                '0'..='9' => self.advance(),
                '.' => {
                    is_dec = true;
                    self.advance();
                }
                'e' | 'E' => {
                    is_dec = true;
                    self.advance();
                    if matches!(self.current(), Some((_, '+' | '-'))) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        let text = &self.body[begin..self.byte_offset()];
        let span = Span::new(begin, self.byte_offset());
        if is_dec {
            text.parse::<f64>()
                .map(Num::Dec)
                .map_err(|_| SyntaxError::new(format!("malformed number '{}'", text), span))
        } else {
            text.parse::<i64>()
                .map(Num::Int)
                .map_err(|_| SyntaxError::new(format!("malformed number '{}'", text), span))
        }
    }

    fn parse_variable(&mut self, begin: usize, dollar: bool) -> Result<Num, SyntaxError> {
        if dollar {
            self.advance();
        }
        let name_begin = self.byte_offset();
        while let Some((_, c)) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let name = &self.body[name_begin..self.byte_offset()];
        let span = Span::new(begin, self.byte_offset());

        match name {
            "True" => return Ok(Num::Bool(true)),
            "False" => return Ok(Num::Bool(false)),
            "" => {
                return Err(SyntaxError::new("expected a variable name", span));
            }
            _ => {}
        }

        let Some(value) = self.context.get(name) else {
            return Err(SyntaxError::new(
                format!("undefined variable '{}'", name),
                span,
            ));
        };
        match &value {
            Value::Int(text) => text
                .parse::<i64>()
                .map(Num::Int)
                .map_err(|_| SyntaxError::new(format!("variable '{}' overflows", name), span)),
            Value::Dec(text) => text
                .parse::<f64>()
                .map(Num::Dec)
                .map_err(|_| SyntaxError::new(format!("variable '{}' is not numeric", name), span)),
            Value::Bool(b) => Ok(Num::Bool(*b)),
            _ => Err(SyntaxError::new(
                format!("variable '{}' is not numeric: {}", name, value),
                span,
            )),
        }
    }
}

fn numeric_op(
    left: Num,
    right: Num,
    dec_op: fn(f64, f64) -> f64,
    int_op: fn(i64, i64) -> Option<i64>,
) -> Num {
    match (left, right) {
        // Integer overflow falls back to the decimal domain.
        (Num::Int(a), Num::Int(b)) => match int_op(a, b) {
            Some(n) => Num::Int(n),
            None => Num::Dec(dec_op(a as f64, b as f64)),
        },
        (a, b) => Num::Dec(dec_op(a.as_dec(), b.as_dec())),
    }
}

fn divide(left: Num, right: Num, offset: usize, modulo: bool) -> Result<Num, SyntaxError> {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => {
            if b == 0 {
                return Err(SyntaxError::new(
                    "division by zero",
                    Span::new(offset, offset + 1),
                ));
            }
            Ok(Num::Int(if modulo { a % b } else { a / b }))
        }
        (a, b) => {
            let divisor = b.as_dec();
            if divisor == 0.0 {
                return Err(SyntaxError::new(
                    "division by zero",
                    Span::new(offset, offset + 1),
                ));
            }
            Ok(Num::Dec(if modulo {
                a.as_dec() % divisor
            } else {
                a.as_dec() / divisor
            }))
        }
    }
}
