//! Suggestion generation - weaknesses, improvements and stronger alternatives.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::charset::{CharacterClassFlags, is_symbol};
use crate::patterns::detect_patterns;
use crate::sections::BANNED_TERMS;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{}|;:,.<>?";

/// How many alternatives the rule-based path proposes.
pub const ALTERNATIVE_COUNT: usize = 3;

/// Attempts per alternative before a candidate containing a banned term is kept anyway.
const MAX_REGENERATIONS: usize = 16;

/// Caller-requested security tier, normally 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SecurityLevel(u8);

impl SecurityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Self {
        Self(level)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_recognized(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }

    /// Minimum length for this tier: `8 + 2 * level`.
    pub fn min_length(&self) -> usize {
        8 + 2 * self.0 as usize
    }

    /// Minimum number of symbols for this tier.
    pub fn min_symbols(&self) -> usize {
        match self.0 {
            0..=1 => 0,
            2..=3 => 1,
            _ => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self.0 {
            1 => "basic (suitable for low-risk accounts)",
            2 => "moderate (suitable for regular online accounts)",
            3 => "strong (suitable for email and social media)",
            4 => "very strong (suitable for financial accounts)",
            5 => "maximum (suitable for critical infrastructure and high-value targets)",
            _ => "standard",
        }
    }
}

impl Default for SecurityLevel {
    fn default() -> Self {
        Self(3)
    }
}

/// Rule-based feedback for one password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSuggestions {
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
    pub alternatives: Vec<String>,
}

/// Lists weaknesses against `level` and proposes [`ALTERNATIVE_COUNT`] alternatives.
pub fn suggest(password: &str, level: SecurityLevel) -> RuleSuggestions {
    suggest_with_rng(password, level, &mut rand::thread_rng())
}

pub fn suggest_with_rng<R: Rng + ?Sized>(
    password: &str,
    level: SecurityLevel,
    rng: &mut R,
) -> RuleSuggestions {
    let mut weaknesses = Vec::new();
    let mut improvements = Vec::new();
    let mut flag = |weakness: String, improvement: String| {
        weaknesses.push(weakness);
        improvements.push(improvement);
    };

    let min_length = level.min_length();
    if password.chars().count() < min_length {
        flag(
            "Your password is too short for the requested security level".to_string(),
            format!("Use at least {} characters", min_length),
        );
    }

    let flags = CharacterClassFlags::from_password(password);
    if !flags.has_lower {
        flag(
            "Missing lowercase letters".to_string(),
            "Add lowercase letters".to_string(),
        );
    }
    if !flags.has_upper {
        flag(
            "Missing uppercase letters".to_string(),
            "Add uppercase letters".to_string(),
        );
    }
    if !flags.has_digit {
        flag("Missing numbers".to_string(), "Add numeric digits".to_string());
    }
    if level.min_symbols() >= 1 && !flags.has_symbol {
        flag(
            "Missing special characters (required for this security level)".to_string(),
            "Add special characters like !@#$%^&*".to_string(),
        );
    }
    if level.min_symbols() >= 2 {
        let symbol_count = password.chars().filter(|&c| is_symbol(c)).count();
        if symbol_count < 2 {
            flag(
                "Not enough special characters for high security level".to_string(),
                "Use at least 2 special characters".to_string(),
            );
        }
    }

    let patterns = detect_patterns(password);
    if !patterns.is_empty() {
        let labels: Vec<&str> = patterns.iter().map(|p| p.label()).collect();
        flag(
            format!("Contains common patterns ({})", labels.join(", ")),
            "Avoid sequential characters and common patterns".to_string(),
        );
    }

    RuleSuggestions {
        weaknesses,
        improvements,
        alternatives: generate_alternatives(level, ALTERNATIVE_COUNT, rng),
    }
}

/// Generates `count` random passwords meeting `level`'s length and class minimums.
///
/// Candidates containing a banned term are regenerated. The output is not
/// re-scored.
pub fn generate_alternatives<R: Rng + ?Sized>(
    level: SecurityLevel,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    (0..count)
        .map(|_| {
            let mut candidate = generate_one(level, rng);
            for _ in 0..MAX_REGENERATIONS {
                if !contains_banned_term(&candidate) {
                    break;
                }
                candidate = generate_one(level, rng);
            }
            candidate
        })
        .collect()
}

fn contains_banned_term(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    BANNED_TERMS.iter().any(|term| lower.contains(term))
}

fn generate_one<R: Rng + ?Sized>(level: SecurityLevel, rng: &mut R) -> String {
    let length = level.min_length();

    let min_lower = (length / 5).max(1);
    let min_upper = (length / 5).max(1);
    let min_digits = (length / 5).max(1);
    let min_special = level.min_symbols();

    let mut remaining = length.saturating_sub(min_lower + min_upper + min_digits + min_special);
    let add_lower = rng.gen_range(0..=remaining);
    remaining -= add_lower;
    let add_upper = rng.gen_range(0..=remaining);
    remaining -= add_upper;
    let add_digits = rng.gen_range(0..=remaining);
    remaining -= add_digits;
    let add_special = remaining;

    let mut chars: Vec<u8> = Vec::with_capacity(length);
    for (set, n) in [
        (LOWERCASE, min_lower + add_lower),
        (UPPERCASE, min_upper + add_upper),
        (DIGITS, min_digits + add_digits),
        (SPECIAL, min_special + add_special),
    ] {
        chars.extend((0..n).map(|_| set[rng.gen_range(0..set.len())]));
    }
    chars.shuffle(rng);

    chars.into_iter().map(char::from).collect()
}
