//! Feature extraction for the strength classifier.
//!
//! This is the only place the classifier's input is computed. The offline
//! trainer must produce its rows through [`FeatureVector::to_row`] as well, so
//! training-time and inference-time features cannot drift apart.

use serde::Serialize;
use std::collections::HashSet;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 8;

/// Feature names in row order. Persisted artifacts must list exactly these.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "length",
    "has_digits",
    "has_lowercase",
    "has_uppercase",
    "has_special",
    "digits_ratio",
    "uppercase_ratio",
    "unique_char_ratio",
];

// Digit features and the uppercase ratio are Unicode-aware; the lowercase and
// uppercase flags are ASCII only.

/// Symbols counted by the `has_special` feature.
const SPECIAL_SET: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub length: usize,
    pub has_digits: bool,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_special: bool,
    pub digits_ratio: f64,
    pub uppercase_ratio: f64,
    pub unique_char_ratio: f64,
}

impl FeatureVector {
    pub fn extract(password: &str) -> Self {
        let chars: Vec<char> = password.chars().collect();
        let length = chars.len();

        let digit_count = chars.iter().filter(|c| c.is_numeric()).count();
        let upper_count = chars.iter().filter(|c| c.is_uppercase()).count();
        let unique_count = chars.iter().collect::<HashSet<_>>().len();

        let ratio = |count: usize| {
            if length == 0 {
                0.0
            } else {
                count as f64 / length as f64
            }
        };

        Self {
            length,
            has_digits: digit_count > 0,
            has_lowercase: chars.iter().any(|c| c.is_ascii_lowercase()),
            has_uppercase: chars.iter().any(|c| c.is_ascii_uppercase()),
            has_special: chars.iter().any(|c| SPECIAL_SET.contains(*c)),
            digits_ratio: ratio(digit_count),
            uppercase_ratio: ratio(upper_count),
            unique_char_ratio: ratio(unique_count),
        }
    }

    /// Numeric row in [`FEATURE_NAMES`] order; booleans are 0.0 / 1.0.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.length as f64,
            flag(self.has_digits),
            flag(self.has_lowercase),
            flag(self.has_uppercase),
            flag(self.has_special),
            self.digits_ratio,
            self.uppercase_ratio,
            self.unique_char_ratio,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty_has_zero_ratios() {
        let f = FeatureVector::extract("");
        assert_eq!(f.length, 0);
        assert_eq!(f.to_row(), [0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_extract_mixed_password() {
        let f = FeatureVector::extract("Ab1!Ab1!");
        assert_eq!(f.length, 8);
        assert!(f.has_digits && f.has_lowercase && f.has_uppercase && f.has_special);
        assert_eq!(f.digits_ratio, 0.25);
        assert_eq!(f.uppercase_ratio, 0.25);
        assert_eq!(f.unique_char_ratio, 0.5);
    }

    #[test]
    fn test_special_feature_uses_fixed_symbol_set() {
        // '-' and '_' are symbols for scoring but not for this feature
        assert!(!FeatureVector::extract("abc-_").has_special);
        assert!(FeatureVector::extract("abc?").has_special);
    }

    #[test]
    fn test_digit_features_are_unicode_aware() {
        // U+0663 ARABIC-INDIC DIGIT THREE
        let f = FeatureVector::extract("ab\u{0663}");
        assert!(f.has_digits);
        assert_eq!(f.digits_ratio, 1.0 / 3.0);

        // case flags stay ASCII while the uppercase ratio does not
        let f = FeatureVector::extract("É1");
        assert!(!f.has_uppercase);
        assert_eq!(f.uppercase_ratio, 0.5);
    }

    #[test]
    fn test_row_order_matches_names() {
        let row = FeatureVector::extract("AAb").to_row();
        assert_eq!(FEATURE_NAMES[0], "length");
        assert_eq!(row[0], 3.0);
        assert_eq!(FEATURE_NAMES[3], "has_uppercase");
        assert_eq!(row[3], 1.0);
        assert_eq!(FEATURE_NAMES[1], "has_digits");
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let pwd = "Tr0ub4dor&3";
        assert_eq!(FeatureVector::extract(pwd), FeatureVector::extract(pwd));
    }
}
