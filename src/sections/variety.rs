//! Character variety sections - penalize single-class and missing-class passwords.

use secrecy::{ExposeSecret, SecretString};
use super::{Penalty, SectionResult};
use crate::charset::CharacterClassFlags;

fn all_nonempty(pwd: &str, pred: impl Fn(char) -> bool) -> bool {
    !pwd.is_empty() && pwd.chars().all(pred)
}

/// Entire password is lowercase letters.
pub fn lowercase_only_section(password: &SecretString) -> SectionResult {
    all_nonempty(password.expose_secret(), |c| c.is_ascii_lowercase())
        .then_some(Penalty::new(10, "Only lowercase letters"))
}

/// Entire password is uppercase letters.
pub fn uppercase_only_section(password: &SecretString) -> SectionResult {
    all_nonempty(password.expose_secret(), |c| c.is_ascii_uppercase())
        .then_some(Penalty::new(10, "Only uppercase letters"))
}

/// Entire password is digits.
pub fn digits_only_section(password: &SecretString) -> SectionResult {
    all_nonempty(password.expose_secret(), |c| c.is_ascii_digit())
        .then_some(Penalty::new(15, "Only digits"))
}

pub fn no_letters_section(password: &SecretString) -> SectionResult {
    let flags = CharacterClassFlags::from_password(password.expose_secret());
    (!flags.has_letters()).then_some(Penalty::new(20, "No letters"))
}

pub fn no_digits_section(password: &SecretString) -> SectionResult {
    let flags = CharacterClassFlags::from_password(password.expose_secret());
    (!flags.has_digit).then_some(Penalty::new(10, "No digits"))
}

pub fn no_symbols_section(password: &SecretString) -> SectionResult {
    let flags = CharacterClassFlags::from_password(password.expose_secret());
    (!flags.has_symbol).then_some(Penalty::new(5, "No special characters"))
}

/// Uppercase letters optionally followed by digits, e.g. `HELLO123`.
pub fn uppercase_with_digits_section(password: &SecretString) -> SectionResult {
    let pwd = password.expose_secret();
    let letters_end = pwd
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(pwd.len());
    let matches = letters_end > 0 && pwd[letters_end..].chars().all(|c| c.is_ascii_digit());
    matches.then_some(Penalty::new(30, "Uppercase letters with trailing digits"))
}
