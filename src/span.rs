//! This module holds utilities useful for handling spans.
//!
//! The main items here are the [`Span`] struct, which holds a byte range of a named source,
//! and the [`Spanned`] trait, which indicates that a struct has a span.
//!
//! Spans never track lines. When a line/column is needed for a diagnostic,
//! it is computed from a [`LineTable`].

use std::fmt::Display;
use std::ops::Range;
use std::sync::Arc;

/// A byte offset into a source buffer.
pub type Cursor = usize;

/// The name of a source buffer (usually a file path).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(Arc<str>);

impl SourceId {
    /// Creates a new source identifier.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name of this source.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        SourceId::new(value)
    }
}
impl From<String> for SourceId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}
impl Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A region of a source buffer, given as a byte offset and a length.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    offset: Cursor,
    length: usize,
    source: SourceId,
}

/// Two spans from different sources were merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanConflict {
    /// The span being merged into
    pub left: Span,
    /// The span from the conflicting source
    pub right: Span,
}
impl Display for SpanConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot merge spans '{}' and '{}': conflicting source names", self.left, self.right)
    }
}
impl std::error::Error for SpanConflict {}

impl Span {
    /// Creates a new span over the given byte range.
    pub fn new(source: SourceId, r: Range<Cursor>) -> Span {
        Span {
            offset: r.start,
            length: r.end.saturating_sub(r.start),
            source
        }
    }

    /// Creates a new span of no characters at the given offset.
    pub fn empty(source: SourceId, at: Cursor) -> Span {
        Span::new(source, at..at)
    }

    /// The start of the span.
    pub fn start(&self) -> Cursor {
        self.offset
    }

    /// The end of the span (exclusive).
    pub fn end(&self) -> Cursor {
        self.offset + self.length
    }

    /// The length of the span in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether this span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The source this span points into.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// The byte range of this span.
    pub fn range(&self) -> Range<Cursor> {
        self.start()..self.end()
    }

    /// Merges a span with another span.
    ///
    /// Spans are contiguous, so merging spans will
    /// also collect everything between the two spans
    /// which may not have originally been part of the spans.
    pub fn merge(&self, span: &Span) -> Result<Span, SpanConflict> {
        if self.source != span.source {
            return Err(SpanConflict { left: self.clone(), right: span.clone() });
        }

        let left = self.start().min(span.start());
        let right = self.end().max(span.end());

        Ok(Span::new(self.source.clone(), left..right))
    }

    /// Merges every span in the iterator.
    ///
    /// This returns `None` if the iterator is empty.
    pub fn merge_all<'s>(spans: impl IntoIterator<Item=&'s Span>) -> Result<Option<Span>, SpanConflict> {
        let mut it = spans.into_iter();
        let Some(first) = it.next() else { return Ok(None) };

        it.try_fold(first.clone(), |acc, span| acc.merge(span)).map(Some)
    }

    /// Extends the end of this span to the given offset.
    ///
    /// The span never shrinks: if the offset is before the current end,
    /// the span is returned unchanged.
    pub fn extend_to(&self, new_end: Cursor) -> Span {
        Span::new(self.source.clone(), self.start()..self.end().max(new_end))
    }

    /// Tests if the other span lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.source == other.source
            && self.start() <= other.start()
            && other.end() <= self.end()
    }
}
impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.offset, self.length, self.source)
    }
}

/// Trait indicating that an item has a span.
pub trait Spanned {
    /// Gets the span of this item.
    fn span(&self) -> &Span;
}
impl Spanned for Span {
    fn span(&self) -> &Span {
        self
    }
}
impl<S: Spanned> Spanned for &S {
    fn span(&self) -> &Span {
        (*self).span()
    }
}
impl<S: Spanned> Spanned for Box<S> {
    fn span(&self) -> &Span {
        (**self).span()
    }
}

/// A line and column (both zero-indexed, column counted in bytes).
pub type LineCol = (usize /* line */, usize /* column */);

/// A table of where each line of a source starts.
///
/// This is built once per source when a diagnostic has to be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineTable {
    starts: Vec<Cursor>,
    len: usize
}

impl LineTable {
    /// Computes the line table of a source text.
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self { starts, len: text.len() }
    }

    /// The number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// The byte range of the given line, excluding its line break.
    pub fn line_range(&self, lno: usize) -> Option<Range<Cursor>> {
        let &start = self.starts.get(lno)?;
        let end = self.starts.get(lno + 1)
            .map_or(self.len, |&next| next - 1);

        Some(start..end)
    }

    /// Converts an offset into a line and column.
    ///
    /// Offsets past the end of the source are clamped to the end.
    pub fn line_col(&self, offset: Cursor) -> LineCol {
        let offset = offset.min(self.len);
        let lno = match self.starts.binary_search(&offset) {
            Ok(l) => l,
            Err(l) => l - 1,
        };

        (lno, offset - self.starts[lno])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: Cursor, end: Cursor) -> Span {
        Span::new(SourceId::new("test.dw"), start..end)
    }

    #[test]
    fn merge_spans() {
        assert_eq!(span(0, 3).merge(&span(5, 8)), Ok(span(0, 8)));
        assert_eq!(span(5, 8).merge(&span(0, 3)), Ok(span(0, 8)));
        assert_eq!(span(0, 10).merge(&span(2, 4)), Ok(span(0, 10)));

        let merged = Span::merge_all(&[span(4, 5), span(1, 2), span(7, 9)]);
        assert_eq!(merged, Ok(Some(span(1, 9))));
        assert_eq!(Span::merge_all(&[] as &[Span]), Ok(None));
    }

    #[test]
    fn merge_conflict() {
        let other = Span::new(SourceId::new("other.dw"), 0..1);
        let err = span(0, 1).merge(&other).unwrap_err();

        assert_eq!(err.left, span(0, 1));
        assert_eq!(err.right, other);
        assert!(Span::merge_all(&[span(0, 1), span(2, 3), other]).is_err());
    }

    #[test]
    fn extend_span() {
        assert_eq!(span(2, 4).extend_to(9), span(2, 9));
        assert_eq!(span(2, 4).extend_to(3), span(2, 4));
        assert!(span(0, 9).contains(&span(2, 4)));
        assert!(!span(2, 4).contains(&span(0, 9)));
    }

    #[test]
    fn line_table() {
        let lines = LineTable::new("let x = 1;\nlet y = 2;\n\nz;");

        assert_eq!(lines.line_count(), 4);
        assert_eq!(lines.line_col(0), (0, 0));
        assert_eq!(lines.line_col(4), (0, 4));
        assert_eq!(lines.line_col(11), (1, 0));
        assert_eq!(lines.line_col(22), (2, 0));
        assert_eq!(lines.line_col(23), (3, 0));
        assert_eq!(lines.line_col(100), (3, 2));
        assert_eq!(lines.line_range(1), Some(11..21));
        assert_eq!(lines.line_range(4), None);
    }
}
