//! Penalty sections
//!
//! Each section checks one weak trait of a password and reports the fixed
//! deduction it carries. Sections are independent; the scorer decides which
//! ones run and sums every penalty that applies.

mod blacklist;
mod length;
mod pattern;
mod variety;

use secrecy::SecretString;
use serde::Serialize;

pub use blacklist::{BANNED_TERMS, banned_term_section, ultra_common_section};
pub use length::short_length_section;
pub use pattern::{alphabetic_run_section, numeric_run_section, repetition_section};
pub use variety::{
    digits_only_section, lowercase_only_section, no_digits_section, no_letters_section,
    no_symbols_section, uppercase_only_section, uppercase_with_digits_section,
};

/// A deduction applied to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Penalty {
    pub points: u32,
    pub reason: &'static str,
}

impl Penalty {
    pub const fn new(points: u32, reason: &'static str) -> Self {
        Self { points, reason }
    }
}

/// Result type for section functions.
/// - `Some(penalty)` - the weakness is present
/// - `None` - section passed
pub type SectionResult = Option<Penalty>;

/// A named section function.
pub type Section = (&'static str, fn(&SecretString) -> SectionResult);

/// Sections applied on every scoring path.
pub const SHARED_SECTIONS: &[Section] = &[
    ("lowercase_only", lowercase_only_section),
    ("uppercase_only", uppercase_only_section),
    ("digits_only", digits_only_section),
    ("repetition", repetition_section),
    ("ultra_common", ultra_common_section),
    ("alphabetic_run", alphabetic_run_section),
    ("numeric_run", numeric_run_section),
    ("banned_term", banned_term_section),
];

/// Extra sections applied when the classifier drives the base score.
pub const CLASSIFIER_SECTIONS: &[Section] = &[
    ("short_length", short_length_section),
    ("no_letters", no_letters_section),
    ("no_digits", no_digits_section),
    ("no_symbols", no_symbols_section),
    ("uppercase_with_digits", uppercase_with_digits_section),
];
