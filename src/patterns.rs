//! Pattern detection - reports known-weak structures found in a password.
//!
//! The detector only reports presence; it knows nothing about scoring weights.

use serde::{Serialize, Serializer};
use std::fmt;

const KEYBOARD_SEQUENCES: &[&str] = &[
    "qwerty",
    "asdfgh",
    "zxcvbn",
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
];

const NUMERIC_SEQUENCES: &[&str] = &["123", "456", "789", "012", "987", "654", "321"];

const COMMON_WORDS: &[&str] = &[
    "password", "admin", "user", "login", "welcome", "letmein", "secret",
];

/// A weak structural feature, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    KeyboardSequence,
    NumericalSequence,
    RepeatedCharacters,
    CommonWord,
    YearPattern,
}

impl Pattern {
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::KeyboardSequence => "keyboard sequence",
            Pattern::NumericalSequence => "numerical sequence",
            Pattern::RepeatedCharacters => "repeated characters",
            Pattern::CommonWord => "common word",
            Pattern::YearPattern => "year pattern",
        }
    }
}

// Serialized as the human-readable label
impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scans `password` for weak patterns.
///
/// Each category appears at most once, in the order keyboard, numeric,
/// repeated, common word, year.
pub fn detect_patterns(password: &str) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    let lower = password.to_lowercase();

    if KEYBOARD_SEQUENCES.iter().any(|seq| lower.contains(seq)) {
        patterns.push(Pattern::KeyboardSequence);
    }
    if NUMERIC_SEQUENCES.iter().any(|seq| password.contains(seq)) {
        patterns.push(Pattern::NumericalSequence);
    }
    if has_repeated_run(password) {
        patterns.push(Pattern::RepeatedCharacters);
    }
    if COMMON_WORDS.iter().any(|word| lower.contains(word)) {
        patterns.push(Pattern::CommonWord);
    }
    if has_year(password) {
        patterns.push(Pattern::YearPattern);
    }

    patterns
}

// Same character three or more times in a row
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    let mut repeated_count = 1;
    for i in 1..chars.len() {
        if chars[i] == chars[i - 1] {
            repeated_count += 1;
            if repeated_count >= 3 {
                return true;
            }
        } else {
            repeated_count = 1;
        }
    }
    false
}

// 19xx or 20xx anywhere in the string
fn has_year(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(4).any(|w| {
        matches!((w[0], w[1]), ('1', '9') | ('2', '0'))
            && w[2].is_ascii_digit()
            && w[3].is_ascii_digit()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_keyboard_sequence_case_insensitive() {
        assert_eq!(detect_patterns("xxQWERTYxx"), vec![Pattern::KeyboardSequence]);
        assert_eq!(detect_patterns("ZxCvBnM"), vec![Pattern::KeyboardSequence]);
    }

    #[test]
    fn test_detect_numeric_sequence() {
        assert_eq!(detect_patterns("ab987cd"), vec![Pattern::NumericalSequence]);
        // "234" is not part of the fixed list
        assert!(detect_patterns("ab234cd").is_empty());
    }

    #[test]
    fn test_detect_repeated_characters() {
        assert_eq!(detect_patterns("xaaay"), vec![Pattern::RepeatedCharacters]);
        assert!(detect_patterns("xaay").is_empty());
    }

    #[test]
    fn test_detect_common_word() {
        assert_eq!(detect_patterns("MySecretStuff"), vec![Pattern::CommonWord]);
    }

    #[test]
    fn test_detect_year_pattern() {
        assert_eq!(detect_patterns("born1987x"), vec![
            Pattern::NumericalSequence,
            Pattern::YearPattern
        ]);
        assert_eq!(detect_patterns("Zk2024"), vec![Pattern::YearPattern]);
        assert!(!detect_patterns("Zk2124").contains(&Pattern::YearPattern));
    }

    #[test]
    fn test_detect_order_and_no_duplicates() {
        let found = detect_patterns("qwerty123aaapassword1999qwerty456");
        assert_eq!(found, vec![
            Pattern::KeyboardSequence,
            Pattern::NumericalSequence,
            Pattern::RepeatedCharacters,
            Pattern::CommonWord,
            Pattern::YearPattern,
        ]);
    }

    #[test]
    fn test_detect_is_idempotent() {
        let pwd = "Welcome2020!!!";
        assert_eq!(detect_patterns(pwd), detect_patterns(pwd));
    }

    #[test]
    fn test_detect_empty_and_strong() {
        assert!(detect_patterns("").is_empty());
        assert!(detect_patterns("Tr0ub4dor&3Zx9!").is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Pattern::YearPattern.to_string(), "year pattern");
        assert_eq!(Pattern::KeyboardSequence.label(), "keyboard sequence");
    }
}
