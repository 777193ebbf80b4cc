use std::fmt;

use manifest_foundation::span::{Span, Spanned};

/// Defines [`TokenKind`] from a sequence of `Kind = "pretty name",`.
macro_rules! define_token_kinds {
    ($($name:tt = $pretty_name:tt),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TokenKind {
            $($name),*
        }

        impl TokenKind {
            /// Name of the token kind as it should appear in diagnostics.
            pub const fn pretty_name(&self) -> &'static str {
                match self {
                    $(TokenKind::$name => $pretty_name),*
                }
            }
        }
    };
}

define_token_kinds! {
    Name    = "header name",
    Colon   = "`:`",
    Value   = "header value",
    Newline = "newline",
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// For values this is the folded text: continuation lines are joined without their leading
    /// space and line breaks.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Creates a zero-width token that stands in for something missing from the source.
    pub fn phantom(kind: TokenKind, offset: usize) -> Self {
        Self::new(kind, "", Span::empty(offset))
    }

    /// Phantom tokens cover no source characters. They are synthesized while recovering from
    /// malformed input.
    pub fn is_phantom(&self) -> bool {
        self.span.is_empty()
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})@{:?}", self.kind, self.text, self.span)
    }
}

#[cfg(test)]
mod tests {
    use manifest_foundation::span::Span;

    use super::{Token, TokenKind};

    #[test]
    fn phantom_tokens_are_empty() {
        let colon = Token::phantom(TokenKind::Colon, 3);
        assert!(colon.is_phantom());
        assert_eq!(colon.span, Span::empty(3));
        assert!(!Token::new(TokenKind::Colon, ":", Span::new(3, 4)).is_phantom());
    }

    #[test]
    fn pretty_names() {
        assert_eq!(TokenKind::Colon.to_string(), "`:`");
        assert_eq!(
            format!("{:?}", Token::new(TokenKind::Name, "A", Span::new(0, 1))),
            "Name(\"A\")@0..1"
        );
    }
}
