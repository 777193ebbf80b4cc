use manifest_foundation::source::SourceContext;
use manifest_lexer::{
    token::TokenKind,
    tokenize, Lexer, LexerConfig,
};
use proptest::prelude::*;

const MAX_INPUT_BYTES: usize = 256;

/// Inputs built from the characters the header grammar cares about, so that every state and
/// recovery path gets exercised.
fn manifest_like() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("A".to_owned()),
            Just("b".to_owned()),
            Just("7".to_owned()),
            Just("-".to_owned()),
            Just("_".to_owned()),
            Just(":".to_owned()),
            Just(" ".to_owned()),
            Just("\n".to_owned()),
            Just("\r".to_owned()),
            Just("\r\n".to_owned()),
            Just("\t".to_owned()),
            Just("é".to_owned()),
            Just(".".to_owned()),
        ],
        0..64,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn lossy_utf8_never_panics(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let stream = tokenize(&input);
        prop_assert!(stream.len() >= 2);
    }

    #[test]
    fn stream_ends_with_a_blank_line(input in manifest_like()) {
        let stream = tokenize(&input);
        let tokens = stream.tokens();
        prop_assert!(tokens.len() >= 2);
        prop_assert!(tokens[tokens.len() - 2..].iter().all(|t| t.kind == TokenKind::Newline));
    }

    #[test]
    fn tokens_are_ordered_and_in_range(input in manifest_like()) {
        let stream = tokenize(&input);
        let source_len = stream.source_context().source().len();
        let mut previous_start = 0;
        for token in stream.tokens() {
            prop_assert!(token.span.start <= token.span.end);
            prop_assert!(token.span.end <= source_len);
            prop_assert!(previous_start <= token.span.start);
            previous_start = token.span.start;
        }
        for problem in stream.problems() {
            prop_assert!(problem.span.start <= problem.span.end);
            prop_assert!(problem.span.end <= source_len);
        }
    }

    #[test]
    fn headers_follow_the_grammar(input in manifest_like()) {
        // NAME COLON VALUE always come as a triple, and every header is followed by a newline.
        let stream = tokenize(&input);
        let kinds: Vec<_> = stream.tokens().iter().map(|t| t.kind).collect();
        let mut i = 0;
        while i < kinds.len() {
            match kinds[i] {
                TokenKind::Newline => i += 1,
                TokenKind::Name => {
                    prop_assert_eq!(
                        &kinds[i..i + 4],
                        &[TokenKind::Name, TokenKind::Colon, TokenKind::Value, TokenKind::Newline]
                    );
                    i += 4;
                }
                other => prop_assert!(false, "unexpected {:?} at {}", other, i),
            }
        }
    }

    #[test]
    fn lexing_is_idempotent(input in manifest_like()) {
        let first = tokenize(&input);
        let second = tokenize(&input);
        prop_assert_eq!(first.tokens(), second.tokens());
        prop_assert_eq!(first.problems(), second.problems());
    }

    #[test]
    fn recorded_lines_match_a_fresh_scan(input in manifest_like()) {
        let stream = tokenize(&input);
        let context = stream.source_context();
        let rescanned = SourceContext::new("MANIFEST.MF", context.source());
        prop_assert_eq!(context.line_starts(), rescanned.line_starts());
    }

    #[test]
    fn small_limits_still_terminate(input in manifest_like(), limit in 1usize..4) {
        let stream = Lexer::with_config(LexerConfig { max_token_length: limit }).lex(&input);
        for token in stream.tokens() {
            if token.kind == TokenKind::Name {
                prop_assert!(token.text.chars().count() <= limit);
            }
        }
    }
}
