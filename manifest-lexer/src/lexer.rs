use std::{io::Read, mem};

use manifest_foundation::{source::newline_len, span::Span};
use tracing::{debug, debug_span, trace};

use crate::{
    chars::{is_alphanumeric, is_name_char, is_newline},
    problem::{Problem, ProblemKind},
    token::{Token, TokenKind},
    token_stream::{TokenStream, TokenStreamBuilder},
};

/// Upper bound on the number of characters kept in a single name or value.
pub const MAX_TOKEN_LENGTH: usize = 65535;

/// Name given to sources lexed without an explicit name.
pub const DEFAULT_SOURCE_NAME: &str = "MANIFEST.MF";

/// Appended to every input so that the last section is always terminated by a blank line.
const TRAILING_NEWLINES: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Names are truncated to this many characters. Values are kept whole, but exceeding it is
    /// still reported.
    pub max_token_length: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            max_token_length: MAX_TOKEN_LENGTH,
        }
    }
}

/// Recovering lexer for manifest headers (`Name: Value` lines, continuation lines starting with a
/// single space, sections separated by blank lines).
///
/// Lexing never fails. Malformed input is reported as [`Problem`]s and patched over with
/// zero-width phantom tokens, so the resulting token sequence always follows the header grammar.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    config: LexerConfig,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `max_token_length` of 0 is raised to 1. Observed names always keep their first character,
    /// so only phantom tokens are empty.
    pub fn with_config(config: LexerConfig) -> Self {
        Self {
            config: LexerConfig {
                max_token_length: config.max_token_length.max(1),
            },
        }
    }

    pub fn lex(&self, input: &str) -> TokenStream {
        self.lex_named(DEFAULT_SOURCE_NAME, input)
    }

    /// Lexes `input`, naming the source `name` in rendered diagnostics.
    pub fn lex_named(&self, name: &str, input: &str) -> TokenStream {
        let _span = debug_span!("lex", source = name, input_len = input.len()).entered();

        let mut text = String::with_capacity(input.len() + TRAILING_NEWLINES.len());
        text.push_str(input);
        text.push_str(TRAILING_NEWLINES);

        let mut run = Run::new(&self.config, &text, input.len());
        run.run();
        let builder = run.finish();
        let stream = builder.finish(name, text);
        debug!(
            tokens = stream.len(),
            problems = stream.problems().len(),
            "lexing finished"
        );
        stream
    }

    /// Reads `reader` to the end and lexes its contents.
    ///
    /// Read errors, including invalid UTF-8, are returned as they are.
    pub fn lex_reader(&self, mut reader: impl Read) -> std::io::Result<TokenStream> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(self.lex(&input))
    }
}

/// Lexes `input` with the default configuration.
pub fn tokenize(input: &str) -> TokenStream {
    Lexer::new().lex(input)
}

/// Reads `reader` to the end and lexes its contents with the default configuration.
pub fn tokenize_reader(reader: impl Read) -> std::io::Result<TokenStream> {
    Lexer::new().lex_reader(reader)
}

/// Index of an emitted name token. Carried by the states that belong to a header so that
/// problems can mention the header's name.
type NameToken = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    ParsingName,
    ParsingValueHeaderChar { name: NameToken },
    ParsingValue { name: NameToken },
    ParsingNameOrContinuation { name: NameToken },
}

/// State of a single pass over the input.
struct Run<'a> {
    config: &'a LexerConfig,
    input: &'a str,
    position: usize,
    state: State,
    builder: TokenStreamBuilder,

    /// Text of the name or value being accumulated.
    buffer: String,
    buffer_chars: usize,
    token_start: usize,
    token_end: usize,
    /// Start of the name characters dropped for exceeding the length limit.
    name_overflow: Option<usize>,
    value_too_long_reported: bool,

    /// Newlines scanned but not yet emitted. They are dropped if they turn out to belong to a
    /// continuation line.
    pending_newlines: Vec<Span>,
}

impl<'a> Run<'a> {
    fn new(config: &'a LexerConfig, input: &'a str, capacity_hint: usize) -> Self {
        Self {
            config,
            input,
            position: 0,
            state: State::Default,
            builder: TokenStreamBuilder::new(),
            buffer: String::with_capacity(capacity_hint.min(config.max_token_length)),
            buffer_chars: 0,
            token_start: 0,
            token_end: 0,
            name_overflow: None,
            value_too_long_reported: false,
            pending_newlines: vec![],
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.current_char() {
            self.state = match self.state {
                State::Default => self.default(c),
                State::ParsingName => self.parsing_name(c),
                State::ParsingValueHeaderChar { name } => self.parsing_value_header_char(c, name),
                State::ParsingValue { name } => self.parsing_value(c, name),
                State::ParsingNameOrContinuation { name } => {
                    self.parsing_name_or_continuation(c, name)
                }
            };
        }
    }

    fn finish(self) -> TokenStreamBuilder {
        // The input always ends with a blank line, which returns every state to Default.
        debug_assert_eq!(
            self.state,
            State::Default,
            "lexer ended outside of the default state"
        );
        debug_assert!(self.pending_newlines.is_empty());
        self.builder
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position..)?.chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.current_char() {
            self.position += c.len_utf8();
        }
    }

    fn char_span(&self, c: char) -> Span {
        Span::new(self.position, self.position + c.len_utf8())
    }

    fn record_problem(&mut self, kind: ProblemKind, span: Span, inserts: Vec<String>) {
        trace!(?kind, code = kind.code(), ?span, "recorded problem");
        self.builder.problem(Problem::new(kind, span, inserts));
    }

    fn name_insert(&self, name: NameToken) -> Vec<String> {
        vec![self.builder.token(name).text.clone()]
    }

    /// Consumes a run of consecutive newlines, buffering one span for each. Returns the span of the
    /// whole run.
    fn scan_newlines(&mut self) -> Span {
        let start = self.position;
        while let Some(len) = newline_len(&self.input[self.position..]) {
            let newline = Span::new(self.position, self.position + len);
            self.position = newline.end;
            self.builder.line_break(self.position);
            self.pending_newlines.push(newline);
        }
        Span::new(start, self.position)
    }

    /// Two or more newlines in a row make a blank line, which ends a section.
    fn is_blank_line(&self) -> bool {
        self.pending_newlines.len() >= 2
    }

    fn flush_newlines(&mut self) {
        let input = self.input;
        for newline in self.pending_newlines.drain(..) {
            self.builder.push(Token::new(
                TokenKind::Newline,
                newline.get_input(input),
                newline,
            ));
        }
    }

    fn discard_newlines(&mut self) {
        self.pending_newlines.clear();
    }

    fn begin_token(&mut self, start: usize) {
        self.buffer.clear();
        self.buffer_chars = 0;
        self.token_start = start;
        self.token_end = start;
        self.name_overflow = None;
        self.value_too_long_reported = false;
    }

    fn emit_name(&mut self) -> NameToken {
        if let Some(overflow_start) = self.name_overflow.take() {
            self.record_problem(
                ProblemKind::NameTooLong,
                Span::new(overflow_start, self.position),
                vec![self.config.max_token_length.to_string()],
            );
        }
        let text = mem::take(&mut self.buffer);
        self.builder.push(Token::new(
            TokenKind::Name,
            text,
            Span::new(self.token_start, self.token_end),
        ))
    }

    fn emit_value(&mut self) {
        let text = mem::take(&mut self.buffer);
        self.builder.push(Token::new(
            TokenKind::Value,
            text,
            Span::new(self.token_start, self.token_end),
        ));
    }

    /// Patches a header whose value is missing with a phantom value, then ends the section
    /// bookkeeping by emitting the buffered newlines.
    fn phantom_value(&mut self, offset: usize) {
        self.builder.push_phantom(TokenKind::Value, offset);
        self.flush_newlines();
    }

    fn default(&mut self, c: char) -> State {
        if is_alphanumeric(c) {
            self.begin_token(self.position);
            State::ParsingName
        } else if is_newline(c) {
            self.scan_newlines();
            self.flush_newlines();
            State::Default
        } else if c == ' ' {
            self.record_problem(
                ProblemKind::NameMustStartWithAlphanumeric,
                self.char_span(c),
                vec![],
            );
            self.advance_char();
            State::Default
        } else {
            self.record_problem(
                ProblemKind::IllegalNameChar,
                self.char_span(c),
                vec![c.to_string()],
            );
            self.advance_char();
            State::Default
        }
    }

    fn parsing_name(&mut self, c: char) -> State {
        if is_name_char(c) {
            if self.buffer_chars < self.config.max_token_length {
                self.buffer.push(c);
                self.buffer_chars += 1;
                self.token_end = self.position + c.len_utf8();
            } else {
                self.name_overflow.get_or_insert(self.position);
            }
            self.advance_char();
            State::ParsingName
        } else if c == ':' {
            let name = self.emit_name();
            let colon = self.char_span(c);
            self.builder
                .push(Token::new(TokenKind::Colon, colon.get_input(self.input), colon));
            self.advance_char();
            State::ParsingValueHeaderChar { name }
        } else if c == ' ' {
            let name = self.emit_name();
            self.record_problem(
                ProblemKind::NameEndedWithSpaceRatherThanColon,
                self.char_span(c),
                self.name_insert(name),
            );
            // The space is left for the next state, where it separates the colon from the value.
            self.builder.push_phantom(TokenKind::Colon, self.position);
            State::ParsingValueHeaderChar { name }
        } else if is_newline(c) {
            let name = self.emit_name();
            let newline_start = self.position;
            let newline_width = newline_len(&self.input[newline_start..]).unwrap_or(1);
            self.record_problem(
                ProblemKind::NameEndedPrematurelyWithNewline,
                Span::new(newline_start, newline_start + newline_width),
                self.name_insert(name),
            );
            self.builder.push_phantom(TokenKind::Colon, newline_start);
            self.scan_newlines();
            if !self.is_blank_line() && self.current_char() == Some(' ') {
                // The value starts on a continuation line.
                self.discard_newlines();
                State::ParsingValueHeaderChar { name }
            } else {
                let name_span = self.builder.token(name).span;
                self.record_problem(ProblemKind::MissingValue, name_span, self.name_insert(name));
                self.phantom_value(newline_start);
                State::Default
            }
        } else {
            self.record_problem(
                ProblemKind::IllegalNameChar,
                self.char_span(c),
                vec![c.to_string()],
            );
            self.advance_char();
            State::ParsingName
        }
    }

    fn parsing_value_header_char(&mut self, c: char, name: NameToken) -> State {
        if c == ' ' {
            self.advance_char();
            self.begin_token(self.position);
            State::ParsingValue { name }
        } else if is_newline(c) {
            let newline_start = self.position;
            let newlines = self.scan_newlines();
            if self.is_blank_line() {
                self.record_problem(
                    ProblemKind::ValueMustImmediatelyFollowName,
                    newlines,
                    self.name_insert(name),
                );
                self.phantom_value(newline_start);
                State::Default
            } else {
                self.discard_newlines();
                State::ParsingValueHeaderChar { name }
            }
        } else {
            self.record_problem(
                ProblemKind::ValueMustStartWithSpace,
                self.char_span(c),
                self.name_insert(name),
            );
            // The character is not consumed here; it becomes the first character of the value.
            self.begin_token(self.position);
            State::ParsingValue { name }
        }
    }

    fn parsing_value(&mut self, c: char, name: NameToken) -> State {
        if is_newline(c) {
            self.token_end = self.position;
            let newlines = self.scan_newlines();
            let continues = self.current_char() == Some(' ');
            if !self.is_blank_line() {
                State::ParsingNameOrContinuation { name }
            } else if continues {
                self.record_problem(
                    ProblemKind::UnexpectedNewlineDuringValueParsing,
                    newlines,
                    self.name_insert(name),
                );
                State::ParsingNameOrContinuation { name }
            } else {
                self.emit_value();
                self.flush_newlines();
                State::Default
            }
        } else {
            if self.buffer_chars == self.config.max_token_length && !self.value_too_long_reported {
                let mut inserts = self.name_insert(name);
                inserts.push(self.config.max_token_length.to_string());
                self.record_problem(
                    ProblemKind::ValueTooLong,
                    Span::new(self.token_start, self.position),
                    inserts,
                );
                self.value_too_long_reported = true;
            }
            self.buffer.push(c);
            self.buffer_chars += 1;
            self.advance_char();
            State::ParsingValue { name }
        }
    }

    fn parsing_name_or_continuation(&mut self, c: char, name: NameToken) -> State {
        if c == ' ' {
            self.discard_newlines();
            self.advance_char();
            State::ParsingValue { name }
        } else if is_alphanumeric(c) {
            self.emit_value();
            self.flush_newlines();
            self.begin_token(self.position);
            State::ParsingName
        } else {
            self.record_problem(
                ProblemKind::MissingSpaceForContinuation,
                self.char_span(c),
                self.name_insert(name),
            );
            self.discard_newlines();
            State::ParsingValue { name }
        }
    }
}
