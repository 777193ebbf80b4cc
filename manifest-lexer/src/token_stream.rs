use manifest_foundation::{
    errors::{sink::DiagnosticSink, FilesError},
    source::SourceContext,
};
use thiserror::Error;

use crate::{
    problem::{Problem, ProblemKind},
    token::{Token, TokenKind},
};

/// Tokens produced by one lexer run, the source they came from, and the problems found on the
/// way.
///
/// The stream is read-only once lexing finishes. It keeps a cursor for sequential consumption;
/// moving the cursor around is the only mutation it allows.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    problems: Vec<Problem>,
    source_context: SourceContext,
    position: usize,
}

impl TokenStream {
    /// Returns the token under the cursor and advances past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// Returns the token `offset` places after the cursor without consuming anything.
    pub fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position.checked_add(offset)?)
    }

    /// Returns the token most recently returned by [`TokenStream::next`].
    pub fn peek_last(&self) -> Option<&Token> {
        self.tokens.get(self.position.checked_sub(1)?)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor. Any position from 0 to [`TokenStream::len`] inclusive is valid.
    pub fn set_position(&mut self, position: usize) -> Result<(), PositionOutOfBounds> {
        if position > self.tokens.len() {
            return Err(PositionOutOfBounds {
                position,
                len: self.tokens.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn has_more(&self) -> bool {
        self.position < self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn contains_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source_context
    }

    /// Returns [`Err`] if any problems were found. For consumers that reject malformed input
    /// instead of relying on the lexer's recovery.
    pub fn ensure_no_problems(&self) -> Result<(), ProblemsFound> {
        match self.problems.first() {
            None => Ok(()),
            Some(first) => Err(ProblemsFound {
                count: self.problems.len(),
                first: first.kind,
                line: self.source_context.line(first.span.start),
                column: self.source_context.column(first.span.start),
            }),
        }
    }

    /// Converts every problem into a diagnostic and sends it to `sink`, in order of occurrence.
    pub fn emit_problems(&self, sink: &mut dyn DiagnosticSink) {
        for problem in &self.problems {
            sink.emit(problem.to_diagnostic());
        }
    }

    /// Renders every problem as plain text, in order of occurrence.
    pub fn render_problems(&self) -> Result<String, FilesError> {
        let mut output = String::new();
        for problem in &self.problems {
            output.push_str(&problem.to_diagnostic().render(&self.source_context)?);
        }
        Ok(output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token position {position} is out of bounds for a stream of {len} tokens")]
pub struct PositionOutOfBounds {
    pub position: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("manifest has {count} syntax problem(s); the first is {first} at {line}:{column}")]
pub struct ProblemsFound {
    pub count: usize,
    pub first: ProblemKind,
    pub line: usize,
    pub column: usize,
}

/// Append-only half of a [`TokenStream`], used while lexing.
#[derive(Debug, Default)]
pub(crate) struct TokenStreamBuilder {
    tokens: Vec<Token>,
    problems: Vec<Problem>,
    line_starts: Vec<usize>,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
            ..Default::default()
        }
    }

    /// Pushes a token and returns its index.
    pub fn push(&mut self, token: Token) -> usize {
        debug_assert!(
            self.tokens
                .last()
                .map_or(true, |last| last.span.start <= token.span.start),
            "tokens must be pushed in source order"
        );
        let index = self.tokens.len();
        self.tokens.push(token);
        index
    }

    pub fn push_phantom(&mut self, kind: TokenKind, offset: usize) -> usize {
        self.push(Token::phantom(kind, offset))
    }

    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn problem(&mut self, problem: Problem) {
        self.problems.push(problem);
    }

    /// Records that a new line starts at `offset`.
    pub fn line_break(&mut self, offset: usize) {
        self.line_starts.push(offset);
    }

    pub fn finish(self, name: impl Into<String>, source: String) -> TokenStream {
        TokenStream {
            tokens: self.tokens,
            problems: self.problems,
            source_context: SourceContext::from_line_starts(name, source, self.line_starts),
            position: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use manifest_foundation::{errors::Diagnostic, span::Span};

    use crate::{
        problem::{Problem, ProblemKind},
        token::{Token, TokenKind},
    };

    use super::{PositionOutOfBounds, TokenStream, TokenStreamBuilder};

    fn header_stream() -> TokenStream {
        let mut builder = TokenStreamBuilder::new();
        builder.push(Token::new(TokenKind::Name, "A", Span::new(0, 1)));
        builder.push(Token::new(TokenKind::Colon, ":", Span::new(1, 2)));
        builder.push(Token::new(TokenKind::Value, "1", Span::new(3, 4)));
        builder.push(Token::new(TokenKind::Newline, "\n", Span::new(4, 5)));
        builder.line_break(5);
        builder.finish("MANIFEST.MF", "A: 1\n".to_owned())
    }

    #[test]
    fn cursor_movement() {
        let mut stream = header_stream();
        assert_eq!(stream.len(), 4);
        assert!(stream.has_more());
        assert_eq!(stream.peek_last(), None);
        assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Name));
        assert_eq!(stream.peek_nth(2).map(|t| t.kind), Some(TokenKind::Value));

        assert_eq!(stream.next().map(|t| t.kind), Some(TokenKind::Name));
        assert_eq!(stream.peek_last().map(|t| t.kind), Some(TokenKind::Name));
        assert_eq!(stream.position(), 1);

        stream.set_position(4).expect("end of stream is a valid position");
        assert!(!stream.has_more());
        assert_eq!(stream.next(), None);
        assert_eq!(stream.peek(), None);
        assert_eq!(stream.peek_last().map(|t| t.kind), Some(TokenKind::Newline));

        stream.set_position(0).expect("rewinding is allowed");
        assert_eq!(stream.next().map(|t| t.text.as_str()), Some("A"));
    }

    #[test]
    fn set_position_checks_bounds() {
        let mut stream = header_stream();
        assert_eq!(
            stream.set_position(5),
            Err(PositionOutOfBounds { position: 5, len: 4 })
        );
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn problems_are_reported_in_order() {
        let mut builder = TokenStreamBuilder::new();
        builder.problem(Problem::new(
            ProblemKind::NameMustStartWithAlphanumeric,
            Span::new(0, 1),
            vec![],
        ));
        builder.problem(Problem::new(
            ProblemKind::IllegalNameChar,
            Span::new(1, 2),
            vec!["-".into()],
        ));
        let stream = builder.finish("MANIFEST.MF", " -\n\n".to_owned());
        assert!(stream.contains_problems());

        let error = stream.ensure_no_problems().unwrap_err();
        assert_eq!(error.count, 2);
        assert_eq!(error.first, ProblemKind::NameMustStartWithAlphanumeric);
        assert_eq!((error.line, error.column), (1, 1));

        let mut sink: Vec<Diagnostic> = vec![];
        stream.emit_problems(&mut sink);
        let codes: Vec<_> = sink.iter().map(|d| d.code.as_deref()).collect();
        assert_eq!(codes, vec![Some("MF001"), Some("MF002")]);
    }

    #[test]
    fn clean_stream_passes_strict_check() {
        let stream = header_stream();
        assert!(!stream.contains_problems());
        assert_eq!(stream.ensure_no_problems(), Ok(()));
        assert_eq!(stream.render_problems().ok().as_deref(), Some(""));
    }
}
