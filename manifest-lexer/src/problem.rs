//! Recoverable syntax problems found while lexing.

use std::fmt;

use manifest_foundation::{
    errors::{Diagnostic, Label, ReplacementSuggestion},
    span::{Span, Spanned},
};

/// Every malformed-input situation the lexer recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProblemKind {
    NameMustStartWithAlphanumeric,
    IllegalNameChar,
    NameTooLong,
    NameEndedWithSpaceRatherThanColon,
    NameEndedPrematurelyWithNewline,
    MissingValue,
    ValueMustStartWithSpace,
    ValueMustImmediatelyFollowName,
    ValueTooLong,
    UnexpectedNewlineDuringValueParsing,
    MissingSpaceForContinuation,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 11] = [
        ProblemKind::NameMustStartWithAlphanumeric,
        ProblemKind::IllegalNameChar,
        ProblemKind::NameTooLong,
        ProblemKind::NameEndedWithSpaceRatherThanColon,
        ProblemKind::NameEndedPrematurelyWithNewline,
        ProblemKind::MissingValue,
        ProblemKind::ValueMustStartWithSpace,
        ProblemKind::ValueMustImmediatelyFollowName,
        ProblemKind::ValueTooLong,
        ProblemKind::UnexpectedNewlineDuringValueParsing,
        ProblemKind::MissingSpaceForContinuation,
    ];

    /// Stable code shown alongside rendered diagnostics.
    pub const fn code(&self) -> &'static str {
        match self {
            ProblemKind::NameMustStartWithAlphanumeric => "MF001",
            ProblemKind::IllegalNameChar => "MF002",
            ProblemKind::NameTooLong => "MF003",
            ProblemKind::NameEndedWithSpaceRatherThanColon => "MF004",
            ProblemKind::NameEndedPrematurelyWithNewline => "MF005",
            ProblemKind::MissingValue => "MF006",
            ProblemKind::ValueMustStartWithSpace => "MF007",
            ProblemKind::ValueMustImmediatelyFollowName => "MF008",
            ProblemKind::ValueTooLong => "MF009",
            ProblemKind::UnexpectedNewlineDuringValueParsing => "MF010",
            ProblemKind::MissingSpaceForContinuation => "MF011",
        }
    }

    /// The conventional upper-snake-case name of the problem, e.g. `MISSING_VALUE`.
    pub const fn name(&self) -> &'static str {
        match self {
            ProblemKind::NameMustStartWithAlphanumeric => "NAME_MUST_START_WITH_ALPHANUMERIC",
            ProblemKind::IllegalNameChar => "ILLEGAL_NAME_CHAR",
            ProblemKind::NameTooLong => "NAME_TOO_LONG",
            ProblemKind::NameEndedWithSpaceRatherThanColon => {
                "NAME_ENDED_WITH_SPACE_RATHER_THAN_COLON"
            }
            ProblemKind::NameEndedPrematurelyWithNewline => "NAME_ENDED_PREMATURELY_WITH_NEWLINE",
            ProblemKind::MissingValue => "MISSING_VALUE",
            ProblemKind::ValueMustStartWithSpace => "VALUE_MUST_START_WITH_SPACE",
            ProblemKind::ValueMustImmediatelyFollowName => "VALUE_MUST_IMMEDIATELY_FOLLOW_NAME",
            ProblemKind::ValueTooLong => "VALUE_TOO_LONG",
            ProblemKind::UnexpectedNewlineDuringValueParsing => {
                "UNEXPECTED_NEWLINE_DURING_VALUE_PARSING"
            }
            ProblemKind::MissingSpaceForContinuation => "MISSING_SPACE_FOR_CONTINUATION",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntax problem and the source range it concerns.
///
/// `inserts` hold the values substituted into the human-readable message. Depending on the kind
/// these are the header name, the offending character, or the length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub span: Span,
    pub inserts: Vec<String>,
}

impl Problem {
    pub fn new(kind: ProblemKind, span: Span, inserts: Vec<String>) -> Self {
        Self {
            kind,
            span,
            inserts,
        }
    }

    fn insert(&self, index: usize) -> &str {
        self.inserts.get(index).map(String::as_str).unwrap_or("?")
    }

    pub fn message(&self) -> String {
        match self.kind {
            ProblemKind::NameMustStartWithAlphanumeric => {
                "header name must start with a letter or digit, not a space".to_owned()
            }
            ProblemKind::IllegalNameChar => {
                format!("character `{}` is not allowed in a header name", self.insert(0))
            }
            ProblemKind::NameTooLong => format!(
                "header name is longer than the maximum of {} characters",
                self.insert(0)
            ),
            ProblemKind::NameEndedWithSpaceRatherThanColon => format!(
                "header name `{}` must be followed by `:`, not a space",
                self.insert(0)
            ),
            ProblemKind::NameEndedPrematurelyWithNewline => format!(
                "header name `{}` is followed by a line break instead of `:`",
                self.insert(0)
            ),
            ProblemKind::MissingValue => format!("header `{}` has no value", self.insert(0)),
            ProblemKind::ValueMustStartWithSpace => format!(
                "value of header `{}` must be separated from the `:` by a space",
                self.insert(0)
            ),
            ProblemKind::ValueMustImmediatelyFollowName => format!(
                "value of header `{}` must follow its name, not a blank line",
                self.insert(0)
            ),
            ProblemKind::ValueTooLong => format!(
                "value of header `{}` is longer than the maximum of {} characters",
                self.insert(0),
                self.insert(1)
            ),
            ProblemKind::UnexpectedNewlineDuringValueParsing => format!(
                "value of header `{}` is interrupted by a blank line",
                self.insert(0)
            ),
            ProblemKind::MissingSpaceForContinuation => format!(
                "continuation line of header `{}` must start with a space",
                self.insert(0)
            ),
        }
    }

    fn label_message(&self) -> &'static str {
        match self.kind {
            ProblemKind::NameMustStartWithAlphanumeric => "this space was skipped",
            ProblemKind::IllegalNameChar => "this character was skipped",
            ProblemKind::NameTooLong => "these characters were dropped from the name",
            ProblemKind::NameEndedWithSpaceRatherThanColon => "`:` expected here",
            ProblemKind::NameEndedPrematurelyWithNewline => "`:` expected before this line break",
            ProblemKind::MissingValue => "this header",
            ProblemKind::ValueMustStartWithSpace => "a space was expected before this character",
            ProblemKind::ValueMustImmediatelyFollowName => "the value was expected here",
            ProblemKind::ValueTooLong => "the value exceeds the limit here",
            ProblemKind::UnexpectedNewlineDuringValueParsing => "blank line inside the value",
            ProblemKind::MissingSpaceForContinuation => "this line continues the previous value",
        }
    }

    /// Describes the text the lexer acted as if it had seen, when there is one.
    fn suggestion(&self) -> Option<(&'static str, ReplacementSuggestion)> {
        let insert_at = |offset: usize, replacement: &str| ReplacementSuggestion {
            span: Span::empty(offset),
            replacement: replacement.to_owned(),
        };
        match self.kind {
            ProblemKind::NameEndedWithSpaceRatherThanColon => Some((
                "help: separate the name from the value with a colon",
                ReplacementSuggestion {
                    span: self.span,
                    replacement: ": ".to_owned(),
                },
            )),
            ProblemKind::NameEndedPrematurelyWithNewline => Some((
                "help: add a colon after the name",
                insert_at(self.span.start, ":"),
            )),
            ProblemKind::ValueMustStartWithSpace => Some((
                "help: add a space before the value",
                insert_at(self.span.start, " "),
            )),
            ProblemKind::MissingSpaceForContinuation => Some((
                "help: indent the continuation line by one space",
                insert_at(self.span.start, " "),
            )),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.message())
            .with_code(self.kind.code())
            .with_label(Label::primary(self.span, self.label_message()));
        let diagnostic = match self.kind {
            ProblemKind::NameMustStartWithAlphanumeric => diagnostic.with_note(
                "note: continuation lines starting with a space are only allowed after a header value",
            ),
            ProblemKind::UnexpectedNewlineDuringValueParsing => diagnostic
                .with_note("note: the indented line was still treated as part of the value"),
            _ => diagnostic,
        };
        match self.suggestion() {
            Some(note) => diagnostic.with_note(note),
            None => diagnostic,
        }
    }
}

impl Spanned for Problem {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
