//! Character-space estimation - alphabet size and keyspace of a password.

use num_bigint::BigUint;

/// Presence of each recognized character class in a password.
///
/// Classes are ASCII only: code points outside ASCII count toward none of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterClassFlags {
    pub has_lower: bool,
    pub has_upper: bool,
    pub has_digit: bool,
    pub has_symbol: bool,
}

impl CharacterClassFlags {
    pub fn from_password(password: &str) -> Self {
        let mut flags = Self::default();
        for c in password.chars() {
            if c.is_ascii_lowercase() {
                flags.has_lower = true;
            } else if c.is_ascii_uppercase() {
                flags.has_upper = true;
            } else if c.is_ascii_digit() {
                flags.has_digit = true;
            } else if is_symbol(c) {
                flags.has_symbol = true;
            }
        }
        flags
    }

    /// Number of classes present (0-4).
    pub fn count(&self) -> u32 {
        [self.has_lower, self.has_upper, self.has_digit, self.has_symbol]
            .iter()
            .filter(|&&b| b)
            .count() as u32
    }

    pub fn has_letters(&self) -> bool {
        self.has_lower || self.has_upper
    }
}

/// Symbol class: any ASCII character that is not a letter or digit.
pub(crate) fn is_symbol(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_alphanumeric()
}

/// Size of the alphabet implied by the classes present, never less than 1.
pub fn charset_size(password: &str) -> u32 {
    let flags = CharacterClassFlags::from_password(password);
    let mut size = 0;
    if flags.has_lower {
        size += 26;
    }
    if flags.has_upper {
        size += 26;
    }
    if flags.has_digit {
        size += 10;
    }
    if flags.has_symbol {
        // Approximation of the printable symbols
        size += 33;
    }
    size.max(1)
}

/// Exact number of candidate strings: `charset_size ^ length`.
///
/// The empty password has a keyspace of 1.
pub fn keyspace(password: &str) -> BigUint {
    let length = password.chars().count();
    let base = BigUint::from(charset_size(password));
    // Lengths beyond u32::MAX cannot come from a real string allocation in practice.
    base.pow(u32::try_from(length).unwrap_or(u32::MAX))
}
