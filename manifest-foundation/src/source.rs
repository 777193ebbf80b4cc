//! Types for mapping byte offsets in a source text to lines and columns.

use std::{cmp::Ordering, ops::Range};

use codespan_reporting::files::Files;
use thiserror::Error;

/// The text of a single lexed source, together with the offsets at which its lines start.
///
/// Line numbers and columns handed out by this type are 1-based, matching what editors show.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// The source's pretty name, used when rendering diagnostics.
    pub name: String,
    source: String,
    /// Sorted byte offsets of line starts. The first line always starts at 0.
    line_starts: Vec<usize>,
}

impl SourceContext {
    /// Creates a new [`SourceContext`], computing line starts from the text.
    ///
    /// `\r\n`, `\n` and a lone `\r` all end a line.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = line_starts(&source).collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Creates a new [`SourceContext`] from line starts that were already recorded while scanning
    /// the text.
    ///
    /// `line_starts` must be sorted. A leading 0 is inserted if it is missing.
    pub fn from_line_starts(
        name: impl Into<String>,
        source: impl Into<String>,
        mut line_starts: Vec<usize>,
    ) -> Self {
        debug_assert!(
            line_starts.windows(2).all(|pair| pair[0] <= pair[1]),
            "line starts must be sorted"
        );
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        Self {
            name: name.into(),
            source: source.into(),
            line_starts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Returns the 0-based index of the line containing `offset`.
    ///
    /// An offset equal to a line start belongs to that line; an offset between two line starts
    /// belongs to the line started by the greater one not exceeding it.
    pub fn line_index(&self, offset: usize) -> usize {
        self.line_starts
            .binary_search(&offset)
            .unwrap_or_else(|next_line| next_line - 1)
    }

    /// Returns the 1-based line number containing `offset`.
    pub fn line(&self, offset: usize) -> usize {
        self.line_index(offset) + 1
    }

    /// Returns the 1-based column of `offset`, counted in characters from the start of its line.
    pub fn column(&self, offset: usize) -> usize {
        let line_start = self.line_starts[self.line_index(offset)];
        let characters = self
            .source
            .get(line_start..offset)
            .map(|line| line.chars().count())
            .unwrap_or(offset.saturating_sub(line_start));
        characters + 1
    }

    /// Returns the text of the 1-based line `line`, without its line terminator.
    pub fn line_text(&self, line: usize) -> Result<&str, SourceError> {
        if line == 0 || line > self.line_starts.len() {
            return Err(SourceError::LineOutOfRange {
                given: line,
                max: self.line_starts.len(),
            });
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        let text = &self.source[start..end];
        Ok(text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .or_else(|| text.strip_suffix('\r'))
            .unwrap_or(text))
    }

    fn line_start(&self, line_index: usize) -> Result<usize, codespan_reporting::files::Error> {
        match line_index.cmp(&self.line_starts.len()) {
            Ordering::Less => Ok(self
                .line_starts
                .get(line_index)
                .cloned()
                .expect("failed despite previous check")),
            Ordering::Equal => Ok(self.source.len()),
            Ordering::Greater => Err(codespan_reporting::files::Error::LineTooLarge {
                given: line_index,
                max: self.line_starts.len() - 1,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("line {given} is out of range; the source has {max} lines")]
    LineOutOfRange { given: usize, max: usize },
}

/// Returns the length of the line terminator at the start of `text`, if there is one.
pub fn newline_len(text: &str) -> Option<usize> {
    newline_len_in_bytes(text.as_bytes())
}

fn newline_len_in_bytes(bytes: &[u8]) -> Option<usize> {
    match bytes {
        [b'\r', b'\n', ..] => Some(2),
        [b'\r' | b'\n', ..] => Some(1),
        _ => None,
    }
}

/// Iterates over the byte offsets at which lines start, beginning with 0.
pub fn line_starts(source: &str) -> impl Iterator<Item = usize> + '_ {
    let mut position = 0;
    let mut first = true;
    std::iter::from_fn(move || {
        if first {
            first = false;
            return Some(0);
        }
        let bytes = source.as_bytes();
        while position < bytes.len() {
            if let Some(len) = newline_len_in_bytes(&bytes[position..]) {
                position += len;
                return Some(position);
            }
            position += 1;
        }
        None
    })
}

impl<'f> Files<'f> for SourceContext {
    type FileId = ();
    type Name = &'f str;
    type Source = &'f str;

    fn name(&'f self, _: ()) -> Result<Self::Name, codespan_reporting::files::Error> {
        Ok(&self.name)
    }

    fn source(&'f self, _: ()) -> Result<Self::Source, codespan_reporting::files::Error> {
        Ok(&self.source)
    }

    fn line_index(
        &'f self,
        _: (),
        byte_index: usize,
    ) -> Result<usize, codespan_reporting::files::Error> {
        Ok(SourceContext::line_index(self, byte_index))
    }

    fn line_range(
        &'f self,
        _: (),
        line_index: usize,
    ) -> Result<Range<usize>, codespan_reporting::files::Error> {
        let line_start = self.line_start(line_index)?;
        let next_line_start = self.line_start(line_index + 1)?;
        Ok(line_start..next_line_start)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::{line_starts, SourceContext, SourceError};

    #[test]
    fn line_starts_handle_all_terminators() {
        let starts: Vec<_> = line_starts("a\nb\r\nc\rd").collect();
        assert_eq!(starts, vec![0, 2, 5, 7]);
        let starts: Vec<_> = line_starts("").collect();
        assert_eq!(starts, vec![0]);
    }

    #[test]
    fn lines_and_columns() {
        let context = SourceContext::new(
            "MANIFEST.MF",
            indoc! {"
                Bundle-Name: Example
                Bundle-Version: 1.0
            "},
        );
        assert_eq!(context.line(0), 1);
        assert_eq!(context.column(0), 1);
        // Offset of the line start itself.
        assert_eq!(context.line(21), 2);
        assert_eq!(context.column(21), 1);
        assert_eq!(context.line(25), 2);
        assert_eq!(context.column(25), 5);
        assert_eq!(context.line_text(1), Ok("Bundle-Name: Example"));
        assert_eq!(context.line_text(2), Ok("Bundle-Version: 1.0"));
        assert_eq!(context.line_text(3), Ok(""));
    }

    #[test]
    fn columns_count_characters() {
        let context = SourceContext::new("MANIFEST.MF", "Name: Zürich-Ä");
        // 'Ä' is preceded by 13 characters, one of which is the two-byte 'ü'.
        assert_eq!(context.column(14), 14);
    }

    #[test]
    fn line_text_strips_crlf() {
        let context = SourceContext::new("MANIFEST.MF", "A: 1\r\nB: 2\r\n");
        assert_eq!(context.line_text(1), Ok("A: 1"));
        assert_eq!(context.line_text(2), Ok("B: 2"));
    }

    #[test]
    fn line_text_out_of_range() {
        let context = SourceContext::new("MANIFEST.MF", "A: 1\n");
        assert_eq!(
            context.line_text(0),
            Err(SourceError::LineOutOfRange { given: 0, max: 2 })
        );
        assert_eq!(
            context.line_text(3),
            Err(SourceError::LineOutOfRange { given: 3, max: 2 })
        );
    }

    #[test]
    fn recorded_line_starts_get_a_leading_zero() {
        let context = SourceContext::from_line_starts("MANIFEST.MF", "A\nB", vec![2]);
        assert_eq!(context.line_starts(), &[0, 2]);
        assert_eq!(context.line(1), 1);
        assert_eq!(context.line(2), 2);
    }
}
