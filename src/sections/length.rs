//! Length section - penalizes passwords below the minimum length.

use secrecy::{ExposeSecret, SecretString};
use super::{Penalty, SectionResult};

const MIN_LENGTH: usize = 8;

/// Deducts 15 points when the password is shorter than 8 characters.
pub fn short_length_section(password: &SecretString) -> SectionResult {
    if password.expose_secret().chars().count() < MIN_LENGTH {
        return Some(Penalty::new(15, "Password is shorter than 8 characters"));
    }
    None
}
