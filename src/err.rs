//! Underlying core behind the error printing for the compiler.
//!
//! This module unifies the several different types of errors output by the other modules.
//! Other error types (e.g. [`LexErr`]) can implement the [`DwErr`] trait to keep track of the
//! error type's name and message.
//!
//! [`FullDwErr`] pairs an error with the [`Span`] it occurred at,
//! and does much of the work to convert errors into a printed diagnostic.
//! Lines and columns are only computed here, when a diagnostic is rendered.
//!
//! [`LexErr`]: crate::lexer::LexErr

use std::fmt::Display;

use crate::span::{LineCol, LineTable, Span, Spanned};

/// Errors that can be printed by the Dw compiler.
///
/// This trait requires that the struct provides the name of the error type and the message of the error (in Display).
/// Implementing these enables functionality to designate *where* an error occurred and to produce
/// a formatted error message.
pub trait DwErr: Display + Sized {
    /// The name of the error type (e.g. `syntax error`)
    fn err_name(&self) -> &'static str;

    /// Designate that this error occurred at a specific span
    fn at(self, span: Span) -> FullDwErr<Self> {
        FullDwErr::new(self, span)
    }
}

/// An error that has an associated span.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct FullDwErr<E: DwErr> {
    pub(crate) err: E,
    span: Span
}

impl<E: DwErr> FullDwErr<E> {
    fn new(err: E, span: Span) -> Self {
        Self { err, span }
    }

    /// The inner error.
    pub fn err(&self) -> &E {
        &self.err
    }

    /// Computes the line and column where this error starts.
    pub fn line_col(&self, lines: &LineTable) -> LineCol {
        lines.line_col(self.span.start())
    }

    /// Get a String designating where the error occurred
    /// and the message associated with the error.
    pub fn short_msg(&self, lines: &LineTable) -> String {
        let (lno, cno) = self.line_col(lines);
        format!("{}:{}:{} :: {}: {}", self.span.source(), lno + 1, cno + 1, self.err.err_name(), self.err)
    }

    /// Get a String designating where the error occurred,
    /// the message associated with the error,
    /// and a pointer to what happened at the line to cause the error.
    pub fn full_msg(&self, src: &str) -> String {
        let lines = LineTable::new(src);

        let mut out = vec![self.short_msg(&lines), String::new()];
        out.extend(display_pointer(src, &lines, &self.span));
        out.join("\n")
    }
}
impl<E: DwErr> Spanned for FullDwErr<E> {
    fn span(&self) -> &Span {
        &self.span
    }
}

impl<E: DwErr + PartialEq> PartialEq<E> for FullDwErr<E> {
    fn eq(&self, other: &E) -> bool {
        &self.err == other
    }
}

impl<E: DwErr> Display for FullDwErr<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} :: {}: {}", self.span, self.err.err_name(), self.err)
    }
}
impl<E: DwErr + std::fmt::Debug> std::error::Error for FullDwErr<E> {}

/// Get a line from the original text.
fn get_line<'s>(src: &'s str, lines: &LineTable, lno: usize) -> &'s str {
    lines.line_range(lno)
        .and_then(|r| src.get(r))
        .unwrap_or("")
}

/// Creates the source line and the pointer line(s) which mark the span.
///
/// An empty span is marked with a single `^`.
/// A span in one line is marked with `~`.
/// A span across lines is marked from its start to the end of its first line
/// and from the start of its last line to its end.
fn display_pointer(src: &str, lines: &LineTable, span: &Span) -> Vec<String> {
    let (start_lno, start_cno) = lines.line_col(span.start());
    let (end_lno, end_cno) = lines.line_col(span.end());

    if span.is_empty() {
        let code = get_line(src, lines, start_lno);
        vec![code.to_string(), " ".repeat(start_cno) + "^"]
    } else if start_lno == end_lno {
        let code = get_line(src, lines, start_lno);

        // 3-9
        // 0 1 2 3 4 5 6 7 8 9
        // _ _ _ ~ ~ ~ ~ ~ ~ _ _ _
        let ptrs = " ".repeat(start_cno) + &"~".repeat(end_cno - start_cno);
        vec![code.to_string(), ptrs]
    } else {
        let start_code = get_line(src, lines, start_lno);
        let start_ptr = " ".repeat(start_cno)
            + "^"
            + &"~".repeat(start_code.len().saturating_sub(start_cno + 1));

        let end_code = get_line(src, lines, end_lno);
        let end_ptr = "~".repeat(end_cno.saturating_sub(1)) + "^";

        vec![start_code.to_string(), start_ptr, end_code.to_string(), end_ptr]
    }
}
