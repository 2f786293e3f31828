//! Crack-time estimation.
//!
//! Converts a password's keyspace into time-to-crack figures for several
//! attacker speeds, and estimates a dictionary-attack effort from the
//! password's complexity class.
//!
//! Two formatters exist on purpose. [`format_scenario_time`] is used for the
//! scenario estimates and the dictionary estimate; [`format_visualization_time`]
//! is used for the visualization profiles. They differ in their breakpoints
//! (sub-second handling, months, centuries) and must not be merged.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::charset::{CharacterClassFlags, charset_size, keyspace};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const MONTH: f64 = 2_592_000.0;
const YEAR: f64 = 31_536_000.0;

/// A named attacker speed, in guesses per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub name: &'static str,
    pub guesses_per_second: f64,
}

impl AttackProfile {
    pub const fn new(name: &'static str, guesses_per_second: f64) -> Self {
        Self {
            name,
            guesses_per_second,
        }
    }
}

/// Profiles reported by the scenario estimate.
pub const SCENARIO_PROFILES: [AttackProfile; 5] = [
    AttackProfile::new("online_throttled", 100.0 / HOUR),
    AttackProfile::new("online_unthrottled", 10.0),
    AttackProfile::new("offline_slow_hash", 1e4),
    AttackProfile::new("offline_fast_hash", 1e10),
    AttackProfile::new("specialized_hardware", 1e14),
];

/// Profiles reported by the visualization estimate.
pub const VISUALIZATION_PROFILES: [AttackProfile; 5] = [
    AttackProfile::new("online_throttled", 100.0 / HOUR),
    AttackProfile::new("online_unthrottled", 10.0),
    AttackProfile::new("offline_slow_hash", 1e3),
    AttackProfile::new("offline_fast_hash", 1e9),
    AttackProfile::new("quantum_computer", 1e12),
];

/// Reported when the search time does not fit in an `f64`.
pub const SATURATED_TIME: &str = "longer than the age of the universe";

/// Formats seconds for the scenario and dictionary estimates.
///
/// Months are 30 days and years 365 days. An infinite or NaN input yields
/// [`SATURATED_TIME`].
pub fn format_scenario_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        SATURATED_TIME.to_string()
    } else if seconds < 1.0 {
        "less than a second".to_string()
    } else if seconds < MINUTE {
        format!("{:.1} seconds", seconds)
    } else if seconds < HOUR {
        format!("{:.1} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.1} hours", seconds / HOUR)
    } else if seconds < MONTH {
        format!("{:.1} days", seconds / DAY)
    } else if seconds < YEAR {
        format!("{:.1} months", seconds / MONTH)
    } else {
        format!("{:.1} years", seconds / YEAR)
    }
}

/// Formats seconds for the visualization estimate.
///
/// No sub-second or month buckets; anything past a hundred years is "centuries".
pub fn format_visualization_time(seconds: f64) -> String {
    if seconds < MINUTE {
        format!("{:.1} seconds", seconds)
    } else if seconds < HOUR {
        format!("{:.1} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.1} hours", seconds / HOUR)
    } else if seconds < YEAR {
        format!("{:.1} days", seconds / DAY)
    } else if seconds < YEAR * 100.0 {
        format!("{:.1} years", seconds / YEAR)
    } else {
        "centuries".to_string()
    }
}

/// Lossy conversion used for time arithmetic; saturates to infinity.
pub(crate) fn keyspace_to_f64(keyspace: &BigUint) -> f64 {
    keyspace.to_f64().unwrap_or(f64::INFINITY)
}

/// Average-case seconds to search `keyspace` at `guesses_per_second`.
pub fn average_seconds(keyspace: &BigUint, guesses_per_second: f64) -> f64 {
    (keyspace_to_f64(keyspace) / 2.0) / guesses_per_second
}

pub(crate) fn serialize_biguint<S: Serializer>(
    value: &BigUint,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn profile_times(
    keyspace: &BigUint,
    profiles: &[AttackProfile],
    format: fn(f64) -> String,
) -> BTreeMap<String, String> {
    profiles
        .iter()
        .map(|p| {
            (
                p.name.to_string(),
                format(average_seconds(keyspace, p.guesses_per_second)),
            )
        })
        .collect()
}

/// Brute-force estimates for one password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrackTimeEstimate {
    pub charset_size: u32,
    #[serde(serialize_with = "serialize_biguint")]
    pub combinations: BigUint,
    /// Scenario profile name to formatted time.
    pub crack_times: BTreeMap<String, String>,
    /// Visualization profile name to formatted time.
    pub visualization_times: BTreeMap<String, String>,
    pub complexity: Complexity,
    pub complexity_description: &'static str,
    pub dictionary: DictionaryEstimate,
}

pub fn estimate(password: &str) -> CrackTimeEstimate {
    let combinations = keyspace(password);
    let complexity = Complexity::classify(password);
    CrackTimeEstimate {
        charset_size: charset_size(password),
        crack_times: profile_times(&combinations, &SCENARIO_PROFILES, format_scenario_time),
        visualization_times: profile_times(
            &combinations,
            &VISUALIZATION_PROFILES,
            format_visualization_time,
        ),
        complexity,
        complexity_description: complexity.description(),
        dictionary: DictionaryEstimate::for_complexity(complexity),
        combinations,
    }
}

/// Coarse complexity class driving the dictionary estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl Complexity {
    pub fn classify(password: &str) -> Self {
        let length = password.chars().count();
        let char_types = CharacterClassFlags::from_password(password).count();

        if length < 6 {
            Complexity::VeryWeak
        } else if length < 8 || char_types < 2 {
            Complexity::Weak
        } else if length < 10 || char_types < 3 {
            Complexity::Medium
        } else if length < 12 || char_types < 4 {
            Complexity::Strong
        } else {
            Complexity::VeryStrong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::VeryWeak => "very_weak",
            Complexity::Weak => "weak",
            Complexity::Medium => "medium",
            Complexity::Strong => "strong",
            Complexity::VeryStrong => "very_strong",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Complexity::VeryWeak => "Very Weak: This password could be cracked almost instantly.",
            Complexity::Weak => "Weak: This password could be cracked within minutes to hours.",
            Complexity::Medium => "Medium: This password would take hours to days to crack.",
            Complexity::Strong => "Strong: This password would take days to months to crack.",
            Complexity::VeryStrong => {
                "Very Strong: This password would take months to years to crack."
            }
        }
    }
}

/// Wordlist size tiers for the dictionary estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryTier {
    Common,
    Medium,
    Large,
}

impl DictionaryTier {
    pub fn size(&self) -> u64 {
        match self {
            DictionaryTier::Common => 10_000,
            DictionaryTier::Medium => 1_000_000,
            DictionaryTier::Large => 100_000_000,
        }
    }
}

const DICTIONARY_ONLINE_PER_HOUR: f64 = 100.0;
const DICTIONARY_OFFLINE_PER_SECOND: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryEstimate {
    pub crackability: &'static str,
    pub dictionary_type: DictionaryTier,
    pub estimated_attempts: u64,
    pub time_online: String,
    pub time_offline: String,
}

impl DictionaryEstimate {
    pub fn for_complexity(complexity: Complexity) -> Self {
        let (crackability, tier, modifier) = match complexity {
            Complexity::VeryWeak => ("Likely in common dictionary", DictionaryTier::Common, 0.8),
            Complexity::Weak => ("Possible with medium dictionary", DictionaryTier::Medium, 0.5),
            Complexity::Medium => (
                "Might require large dictionary with rules",
                DictionaryTier::Large,
                0.3,
            ),
            Complexity::Strong | Complexity::VeryStrong => (
                "Unlikely to be cracked with dictionary approach",
                DictionaryTier::Large,
                0.05,
            ),
        };

        let attempts = (tier.size() as f64 * modifier) as u64;
        let online_hours = attempts as f64 / DICTIONARY_ONLINE_PER_HOUR;
        let offline_seconds = attempts as f64 / DICTIONARY_OFFLINE_PER_SECOND;

        Self {
            crackability,
            dictionary_type: tier,
            estimated_attempts: attempts,
            time_online: format_scenario_time(online_hours * HOUR),
            time_offline: format_scenario_time(offline_seconds),
        }
    }
}
