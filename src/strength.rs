//! Score and category types shared by the scorer and the evaluator.

use serde::Serialize;
use std::fmt;

/// Strength score, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StrengthScore(u8);

impl StrengthScore {
    pub const MAX: u8 = 100;

    /// Clamps any intermediate value into range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn category(&self) -> StrengthCategory {
        StrengthCategory::from_score(*self)
    }
}

impl fmt::Display for StrengthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UI-facing strength buckets. Thresholds and colors are a stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthCategory {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthCategory {
    pub fn from_score(score: StrengthScore) -> Self {
        match score.value() {
            0..20 => StrengthCategory::VeryWeak,
            20..40 => StrengthCategory::Weak,
            40..60 => StrengthCategory::Medium,
            60..80 => StrengthCategory::Strong,
            _ => StrengthCategory::VeryStrong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthCategory::VeryWeak => "very weak",
            StrengthCategory::Weak => "weak",
            StrengthCategory::Medium => "medium",
            StrengthCategory::Strong => "strong",
            StrengthCategory::VeryStrong => "very strong",
        }
    }

    /// Hex color for a strength meter.
    pub fn color(&self) -> &'static str {
        match self {
            StrengthCategory::VeryWeak => "#FF0000",
            StrengthCategory::Weak => "#FF6600",
            StrengthCategory::Medium => "#FFCC00",
            StrengthCategory::Strong => "#99CC00",
            StrengthCategory::VeryStrong => "#00CC00",
        }
    }
}

impl fmt::Display for StrengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StrengthCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
