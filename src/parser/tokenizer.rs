//! Argument Tokenizer
//!
//! Splits the raw argument text of a command call into tokens with exact
//! source offsets, then groups them into positional and keyword slots.
//! The tokenizer respects:
//! - Quoted strings (quotes kept, escapes validated)
//! - Path literals `/…/` closed by a slash at a word boundary
//! - Bracketed groups `(…)`, `{…}`, `[…]` with per-family depth tracking
//! - Flag tokens `-name` opening keyword slots
//! - Trailing `#` comments

use crate::diagnostics::{Frame, Span, StackTrace};

use super::types::{SyntaxError, Token};

/// A keyword slot produced by grouping: `-name [value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSlot {
    pub name: String,
    /// Offset of the flag token that opened the slot.
    pub flag_offset: usize,
    /// The value token, or `None` when the flag was followed by another
    /// flag or by end of input.
    pub value: Option<Token>,
}

/// Tokens split into positional and keyword structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedTokens {
    pub positional: Vec<Token>,
    pub keyword: Vec<KeywordSlot>,
}

/// Whether a token opens a keyword slot. A `-` followed by a digit is a
/// negative number, never a flag.
pub fn is_flag(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('-')
        && chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
}

pub struct Tokenizer<'a> {
    /// The argument text being tokenized.
    text: &'a str,
    /// Byte offset of `text` within the full input line.
    origin: usize,
    /// The full input line, for diagnostics.
    line: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str, origin: usize, line: &'a str) -> Self {
        Self {
            text,
            origin,
            line,
            chars: text.char_indices().collect(),
            pos: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(_, c)| c)
    }

    fn byte_pos(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    fn token_from(&self, begin_byte: usize) -> Token {
        let end_byte = self.byte_pos();
        Token::new(self.origin + begin_byte, &self.text[begin_byte..end_byte])
    }

    fn error(
        &self,
        trace: &mut StackTrace,
        message: impl Into<String>,
        begin_byte: usize,
    ) -> SyntaxError {
        let span = Span::new(self.origin + begin_byte, self.origin + self.byte_pos());
        let content = &self.text[begin_byte..self.byte_pos().max(begin_byte)];
        trace.push(Frame::new("<argument>", span, self.line, content));
        SyntaxError::new(message, span)
    }

    /// Tokenize the whole argument text.
    pub fn tokenize(mut self, trace: &mut StackTrace) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            if c == '#' {
                // Trailing comment: the rest of the input is dropped.
                break;
            }
            let token = match c {
                '\'' | '"' => self.read_quoted(c, trace)?,
                '/' => self.read_path(trace)?,
                '(' => self.read_group('(', ')', trace)?,
                '{' => self.read_group('{', '}', trace)?,
                '[' => self.read_group('[', ']', trace)?,
                _ => self.read_bare(),
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn read_quoted(&mut self, quote: char, trace: &mut StackTrace) -> Result<Token, SyntaxError> {
        let begin = self.byte_pos();
        self.advance();
        while let Some(c) = self.current() {
            match c {
                '\\' => match self.peek(1) {
                    None => {
                        self.advance();
                        return Err(self.error(
                            trace,
                            "escaped nothing at end of string",
                            begin,
                        ));
                    }
                    Some(next) if matches!(next, '\\' | '\'' | '"') => {
                        self.advance();
                        self.advance();
                    }
                    Some(next) => {
                        let esc_begin = self.byte_pos();
                        self.advance();
                        self.advance();
                        return Err(self.error(
                            trace,
                            format!("unknown escape '\\{}'", next),
                            esc_begin,
                        ));
                    }
                },
                c if c == quote => {
                    self.advance();
                    return Ok(self.token_from(begin));
                }
                _ => self.advance(),
            }
        }
        Err(self.error(trace, "unterminated string literal", begin))
    }

    fn read_path(&mut self, trace: &mut StackTrace) -> Result<Token, SyntaxError> {
        let begin = self.byte_pos();
        self.advance();
        while let Some(c) = self.current() {
            if c == '/' {
                let closes = match self.peek(1) {
                    None => true,
                    Some(next) => next.is_whitespace(),
                };
                if closes {
                    self.advance();
                    return Ok(self.token_from(begin));
                }
            }
            self.advance();
        }
        Err(self.error(trace, "unterminated path literal", begin))
    }

    fn read_group(
        &mut self,
        open: char,
        close: char,
        trace: &mut StackTrace,
    ) -> Result<Token, SyntaxError> {
        let begin = self.byte_pos();
        self.advance();
        let mut depth = 0usize;
        while let Some(c) = self.current() {
            // Only the brackets of this family affect depth: inside a
            // parenthesized group a brace is literal text.
            if c == close && depth == 0 {
                self.advance();
                return Ok(self.token_from(begin));
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
            }
            self.advance();
        }
        Err(self.error(trace, format!("unterminated '{}' group", open), begin))
    }

    fn read_bare(&mut self) -> Token {
        let begin = self.byte_pos();
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                break;
            }
            self.advance();
        }
        self.token_from(begin)
    }
}

/// Group a token sequence into positional and keyword structure.
///
/// A flag token opens a keyword slot; the immediately following non-flag
/// token becomes its value. A flag followed by another flag, or by end of
/// input, has no value token (the binder reads that as `Nil`).
pub fn group(tokens: Vec<Token>) -> GroupedTokens {
    let mut grouped = GroupedTokens::default();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if is_flag(&token.text) {
            let value = match iter.peek() {
                Some(next) if !is_flag(&next.text) => iter.next(),
                _ => None,
            };
            grouped.keyword.push(KeywordSlot {
                name: token.text[1..].to_string(),
                flag_offset: token.offset,
                value,
            });
        } else {
            grouped.positional.push(token);
        }
    }

    grouped
}
