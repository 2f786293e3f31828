//! Blacklist sections - penalize common passwords and banned terms.

use secrecy::{ExposeSecret, SecretString};
use super::{Penalty, SectionResult};

const ULTRA_COMMON: &[&str] = &[
    "password", "admin", "user", "login", "welcome", "123456", "qwerty",
];

/// Terms that must never appear anywhere in a password, case-insensitive.
pub const BANNED_TERMS: &[&str] = &[
    "barclays", "bank", "password", "123", "admin", "user", "login", "welcome", "letmein",
];

/// Exact (case-insensitive) match against the most common passwords.
pub fn ultra_common_section(password: &SecretString) -> SectionResult {
    let lower = password.expose_secret().to_lowercase();
    ULTRA_COMMON
        .contains(&lower.as_str())
        .then_some(Penalty::new(20, "Password is one of the most common passwords"))
}

/// Contains a banned term. Only the first match counts.
pub fn banned_term_section(password: &SecretString) -> SectionResult {
    let lower = password.expose_secret().to_lowercase();
    BANNED_TERMS
        .iter()
        .find(|term| lower.contains(*term))
        .map(|_| Penalty::new(50, "Password contains a banned term"))
}
