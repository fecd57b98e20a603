//! Source Map and Diagnostic Stack
//!
//! Every fragment the parser or binder interprets carries a span into the
//! original input line. While a sub-span is being interpreted a frame is
//! pushed here; it is popped on success and left in place on failure, so
//! that a rendered diagnostic shows the innermost frame first.

use std::fmt;

/// A half-open byte range `[begin, end)` into the original input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// One entry in the diagnostic stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pseudo-file tag, e.g. `<input>`, `<argument>`, `<literal>`.
    pub file: String,
    /// 1-based line number within the source.
    pub line: usize,
    /// Column span of the offending content within `source_line`.
    pub span: Span,
    /// The full source line the span points into.
    pub source_line: String,
    /// The content being interpreted when the frame was pushed.
    pub content: String,
}

impl Frame {
    pub fn new(
        file: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line: 1,
            span,
            source_line: source_line.into(),
            content: content.into(),
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str(&format!(
            "File {}, line {}, column {}\n",
            self.file,
            self.line,
            self.span.begin + 1
        ));
        out.push_str(&self.source_line);
        out.push('\n');
        let width = self.span.len().max(1).min(
            self.source_line.len().saturating_sub(self.span.begin).max(1),
        );
        out.push_str(&" ".repeat(self.span.begin));
        out.push_str(&"^".repeat(width));
        out.push('\n');
    }
}

/// A stack of diagnostic frames.
///
/// The stack survives a failed parse: the interpreter clears it at the start
/// of each top-level input, not on error, so the host can still render the
/// frames that were live when the failure occurred.
#[derive(Debug, Default)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Drop frames pushed after the given depth.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Render the stack, innermost frame first.
    ///
    /// Adjacent frames pointing at the same source line are coalesced,
    /// keeping only the innermost, so deeply nested parses do not repeat
    /// the same line over and over.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut last_line: Option<&str> = None;
        for frame in self.frames.iter().rev() {
            if last_line == Some(frame.source_line.as_str()) {
                continue;
            }
            frame.render(&mut out);
            last_line = Some(frame.source_line.as_str());
        }
        out
    }
}
