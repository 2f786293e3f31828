//! Pattern sections - penalize repetition and sequential runs.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashSet;
use super::{Penalty, SectionResult};

const NUMERIC_RUNS: &[&str] = &[
    "123", "234", "345", "456", "567", "678", "789", "012", "987", "654", "321",
];

/// Fewer distinct characters than half the length.
pub fn repetition_section(password: &SecretString) -> SectionResult {
    let pwd = password.expose_secret();
    let length = pwd.chars().count();
    let distinct = pwd.chars().collect::<HashSet<_>>().len();
    ((distinct as f64) < length as f64 * 0.5)
        .then_some(Penalty::new(5, "Too many repeated characters"))
}

/// Three consecutive letters of the alphabet, any case (e.g. "abc", "XYZ").
pub fn alphabetic_run_section(password: &SecretString) -> SectionResult {
    let lower: Vec<char> = password.expose_secret().to_lowercase().chars().collect();
    let found = lower.windows(3).any(|w| {
        w.iter().all(|c| c.is_ascii_lowercase())
            && w[1] as u32 == w[0] as u32 + 1
            && w[2] as u32 == w[1] as u32 + 1
    });
    found.then_some(Penalty::new(10, "Sequential letters"))
}

/// A three-digit ascending or descending run from the fixed list.
pub fn numeric_run_section(password: &SecretString) -> SectionResult {
    let pwd = password.expose_secret();
    NUMERIC_RUNS
        .iter()
        .any(|run| pwd.contains(run))
        .then_some(Penalty::new(10, "Sequential digits"))
}
