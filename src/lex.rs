// Lexical Helpers
//
// fixasm is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// fixasm is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with fixasm.  If not, see <http://www.gnu.org/licenses/>.

use crate::error::AssemblyError;
use crate::opcode::{Directive, Mnemonic};

/// Maximum permitted length, in characters, of a source line.
pub const MAX_LINE_LENGTH: usize = 80;

/// Maximum permitted length, in characters, of a label.
pub const MAX_LABEL_LENGTH: usize = 31;

/// Skips leading ASCII whitespace, returning the remainder.
pub fn skip_ws(s: &str) -> &str {
    s.trim_start_matches(|c: char| c == ' ' || c == '\t')
}

/// True if the trimmed line is empty or a comment (`;` as first non-blank character).
pub fn is_blank_or_comment(line: &str) -> bool {
    let s = skip_ws(line);
    s.is_empty() || s.starts_with(';')
}

/// Recognizes an integer literal: an optional sign followed by one or more digits.
pub fn parse_integer(token: &str) -> Option<i64> {
    if !is_integer(token) {
        return None;
    }
    token.parse().ok()
}

/// True if `token` is a sequence of digits with an optional leading `+`/`-`.
pub fn is_integer(token: &str) -> bool {
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

/// True if `token` consists of a leading letter followed by letters/digits.
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Parses a register token (`r0`..`r7`), returning the register number.
pub fn parse_register(token: &str) -> Option<u8> {
    let rest = token.strip_prefix('r')?;
    let n: u8 = rest.parse().ok()?;
    (n <= 7).then_some(n)
}

/// Parses a register-indirect token (`*r0`..`*r7`), returning the register number.
pub fn parse_register_indirect(token: &str) -> Option<u8> {
    parse_register(token.strip_prefix('*')?)
}

/// True if `word` is a reserved word: an opcode mnemonic, a register
/// name, a directive name, or a register-indirect token.
pub fn is_reserved_word(word: &str) -> bool {
    Mnemonic::from_str(word).is_some()
        || Directive::from_str(word).is_some()
        || parse_register(word).is_some()
        || parse_register_indirect(word).is_some()
}

/// Extracts a leading label from `text`, if one is present.
///
/// A label is an identifier immediately followed by `:`, found within
/// the first [`MAX_LABEL_LENGTH`] characters of `text`. Returns the
/// label name and the text following the colon. Returns `Ok(None)` if
/// there is no colon within the search window (there is simply no
/// label). Returns `Err` if a colon is present but the prefix is not a
/// valid label.
pub fn extract_label(text: &str) -> Result<Option<(&str, &str)>, AssemblyError> {
    let window_end = text
        .char_indices()
        .nth(MAX_LABEL_LENGTH + 2)
        .map_or(text.len(), |(idx, _)| idx);

    let Some(colon) = text[..window_end].find(':') else {
        return Ok(None);
    };

    let name = &text[..colon];
    validate_label_name(name)?;
    Ok(Some((name, &text[colon + 1..])))
}

/// Validates a candidate label name in isolation (begins with a
/// letter, remaining characters alphanumeric, not a reserved word, and
/// within [`MAX_LABEL_LENGTH`] characters).
pub fn validate_label_name(name: &str) -> Result<(), AssemblyError> {
    if name.len() > MAX_LABEL_LENGTH {
        return Err(AssemblyError::LabelTooLong { max: MAX_LABEL_LENGTH });
    }
    if !is_identifier(name) {
        return Err(AssemblyError::MalformedLabel);
    }
    if is_reserved_word(name) {
        return Err(AssemblyError::ReservedWord(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_spaces_and_tabs() {
        assert_eq!(skip_ws("  \tabc"), "abc");
        assert_eq!(skip_ws("abc"), "abc");
    }

    #[test]
    fn recognizes_blank_and_comment_lines() {
        assert!(is_blank_or_comment(""));
        assert!(is_blank_or_comment("   "));
        assert!(is_blank_or_comment("  ; a comment"));
        assert!(!is_blank_or_comment("mov r1, r2"));
    }

    #[test]
    fn recognizes_integers() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("+7"), Some(7));
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("4a"), None);
    }

    #[test]
    fn recognizes_identifiers() {
        assert!(is_identifier("LOOP1"));
        assert!(!is_identifier("1LOOP"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn parses_registers() {
        assert_eq!(parse_register("r0"), Some(0));
        assert_eq!(parse_register("r7"), Some(7));
        assert_eq!(parse_register("r8"), None);
        assert_eq!(parse_register_indirect("*r3"), Some(3));
        assert_eq!(parse_register_indirect("r3"), None);
    }

    #[test]
    fn reserved_words_cover_all_categories() {
        assert!(is_reserved_word("mov"));
        assert!(is_reserved_word("r0"));
        assert!(is_reserved_word("data"));
        assert!(is_reserved_word("*r3"));
        assert!(!is_reserved_word("LOOP"));
    }

    #[test]
    fn extracts_a_simple_label() {
        assert_eq!(extract_label("X: mov r1, r2"), Ok(Some(("X", " mov r1, r2"))));
    }

    #[test]
    fn no_colon_means_no_label() {
        assert_eq!(extract_label("mov r1, r2"), Ok(None));
    }

    #[test]
    fn rejects_label_starting_with_digit() {
        assert_eq!(extract_label("1X: stop"), Err(AssemblyError::MalformedLabel));
    }

    #[test]
    fn rejects_reserved_word_as_label() {
        assert_eq!(
            extract_label("mov: stop"),
            Err(AssemblyError::ReservedWord("mov".to_string()))
        );
    }

    #[test]
    fn rejects_oversize_label() {
        let long = "A".repeat(MAX_LABEL_LENGTH + 1);
        let line = format!("{long}: stop");
        assert_eq!(
            extract_label(&line),
            Err(AssemblyError::LabelTooLong { max: MAX_LABEL_LENGTH })
        );
    }
}
