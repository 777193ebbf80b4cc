use bitflags::bitflags;

bitflags! {
    /// Lexical classes of a character in the manifest header grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CharClass: u8 {
        /// `a-z`, `A-Z`, `0-9`. Header names must start with one of these.
        const ALPHANUMERIC = 0x1;
        /// Characters allowed after the first character of a header name.
        const NAME         = 0x2;
        const SPACE        = 0x4;
        /// `\r` and `\n`. A `\r\n` pair is a single newline.
        const NEWLINE      = 0x8;
        const COLON        = 0x10;
    }
}

/// One past the highest code point covered by [`CLASS_TABLE`]. Every character at or above this
/// bound has no class.
pub const CLASS_TABLE_LEN: usize = 256;

const fn classify_byte(byte: u8) -> CharClass {
    match byte {
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => CharClass::ALPHANUMERIC.union(CharClass::NAME),
        b'-' | b'_' => CharClass::NAME,
        b' ' => CharClass::SPACE,
        b'\r' | b'\n' => CharClass::NEWLINE,
        b':' => CharClass::COLON,
        _ => CharClass::empty(),
    }
}

static CLASS_TABLE: [CharClass; CLASS_TABLE_LEN] = {
    let mut table = [CharClass::empty(); CLASS_TABLE_LEN];
    let mut i = 0;
    while i < CLASS_TABLE_LEN {
        table[i] = classify_byte(i as u8);
        i += 1;
    }
    table
};

pub fn class_of(c: char) -> CharClass {
    CLASS_TABLE
        .get(c as usize)
        .copied()
        .unwrap_or(CharClass::empty())
}

pub fn is_alphanumeric(c: char) -> bool {
    class_of(c).contains(CharClass::ALPHANUMERIC)
}

pub fn is_name_char(c: char) -> bool {
    class_of(c).contains(CharClass::NAME)
}

pub fn is_newline(c: char) -> bool {
    class_of(c).contains(CharClass::NEWLINE)
}

#[cfg(test)]
mod tests {
    use super::{class_of, is_alphanumeric, is_name_char, is_newline, CharClass};

    #[test]
    fn name_characters() {
        for c in ['a', 'z', 'A', 'Z', '0', '9'] {
            assert!(is_alphanumeric(c), "{c:?}");
            assert!(is_name_char(c), "{c:?}");
        }
        for c in ['-', '_'] {
            assert!(!is_alphanumeric(c), "{c:?}");
            assert!(is_name_char(c), "{c:?}");
        }
        for c in ['.', ' ', ':', '\t', '\0', 'é', '\u{ff}'] {
            assert!(!is_name_char(c), "{c:?}");
        }
    }

    #[test]
    fn both_checks_share_one_bound() {
        // U+00FF, U+0100 and U+0101 straddle the end of the table.
        for c in ['\u{ff}', '\u{100}', '\u{101}', '\u{10ffff}'] {
            assert_eq!(class_of(c), CharClass::empty(), "{c:?}");
            assert!(!is_alphanumeric(c));
            assert!(!is_name_char(c));
        }
    }

    #[test]
    fn newlines() {
        assert!(is_newline('\n'));
        assert!(is_newline('\r'));
        assert!(!is_newline(' '));
        assert_eq!(class_of(':'), CharClass::COLON);
        assert_eq!(class_of(' '), CharClass::SPACE);
    }
}
