//! Heuristic scorer - turns a password into a 0-100 strength score.
//!
//! The base score comes either from the binary classifier or, when no
//! classifier is configured, from the zxcvbn estimator. Penalty sections are
//! then deducted and the result is clamped into range.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use zxcvbn::Score;

use crate::charset::CharacterClassFlags;
use crate::classifier::{self, ClassifierError, StrengthClassifier};
use crate::sections::{CLASSIFIER_SECTIONS, Penalty, SHARED_SECTIONS, Section};
use crate::strength::StrengthScore;

/// How the base score is obtained. Chosen once, when the scorer is built.
#[derive(Clone)]
pub enum ScoringStrategy {
    MlBacked(Arc<dyn StrengthClassifier>),
    RuleOnly,
}

impl std::fmt::Debug for ScoringStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringStrategy::MlBacked(_) => f.write_str("MlBacked"),
            ScoringStrategy::RuleOnly => f.write_str("RuleOnly"),
        }
    }
}

/// Which path actually produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringBranch {
    Classifier,
    Fallback,
}

/// A score together with how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: StrengthScore,
    pub branch: ScoringBranch,
    pub base: f64,
    pub bonus: f64,
    pub penalties: Vec<Penalty>,
}

impl ScoreBreakdown {
    pub fn total_penalty(&self) -> u32 {
        self.penalties.iter().map(|p| p.points).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Scorer {
    strategy: ScoringStrategy,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::rule_only()
    }
}

impl Scorer {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self { strategy }
    }

    pub fn rule_only() -> Self {
        Self::new(ScoringStrategy::RuleOnly)
    }

    pub fn with_classifier(classifier: Arc<dyn StrengthClassifier>) -> Self {
        Self::new(ScoringStrategy::MlBacked(classifier))
    }

    /// Builds a scorer from a model artifact. A missing or corrupt artifact
    /// yields a rule-only scorer.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Self {
        match classifier::load_optional(path) {
            Some(model) => Self::with_classifier(Arc::new(model)),
            None => Self::rule_only(),
        }
    }

    pub fn strategy(&self) -> &ScoringStrategy {
        &self.strategy
    }

    pub fn is_classifier_available(&self) -> bool {
        matches!(self.strategy, ScoringStrategy::MlBacked(_))
    }

    /// Raw classifier verdict (`true` = strong).
    ///
    /// Fails with [`ClassifierError::ModelUnavailable`] on a rule-only scorer;
    /// check [`Scorer::is_classifier_available`] first.
    pub fn predict(&self, password: &SecretString) -> Result<bool, ClassifierError> {
        match &self.strategy {
            ScoringStrategy::MlBacked(classifier) => classifier.predict(password.expose_secret()),
            ScoringStrategy::RuleOnly => Err(ClassifierError::ModelUnavailable),
        }
    }

    pub fn score(&self, password: &SecretString) -> StrengthScore {
        self.breakdown(password).score
    }

    pub fn breakdown(&self, password: &SecretString) -> ScoreBreakdown {
        if let ScoringStrategy::MlBacked(classifier) = &self.strategy {
            match classifier.predict(password.expose_secret()) {
                Ok(is_strong) => return classifier_breakdown(password, is_strong),
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Classifier prediction failed: {}, using fallback scoring", _e);
                }
            }
        }
        fallback_breakdown(password)
    }
}

fn collect_penalties(password: &SecretString, groups: &[&[Section]]) -> Vec<Penalty> {
    groups
        .iter()
        .flat_map(|sections| sections.iter())
        .filter_map(|(_name, section_fn)| section_fn(password))
        .collect()
}

fn classifier_breakdown(password: &SecretString, is_strong: bool) -> ScoreBreakdown {
    let pwd = password.expose_secret();
    let length = pwd.chars().count() as i64;
    let complexity = CharacterClassFlags::from_password(pwd).count() as i64;

    let base = if is_strong {
        (60 + 2 * length + 5 * complexity).min(100)
    } else {
        (20 - length).max(0)
    };

    let penalties = collect_penalties(password, &[SHARED_SECTIONS, CLASSIFIER_SECTIONS]);
    let penalty: i64 = penalties.iter().map(|p| p.points as i64).sum();

    ScoreBreakdown {
        score: StrengthScore::new(base - penalty),
        branch: ScoringBranch::Classifier,
        base: base as f64,
        bonus: 0.0,
        penalties,
    }
}

fn fallback_breakdown(password: &SecretString) -> ScoreBreakdown {
    let pwd = password.expose_secret();
    let length = pwd.chars().count();
    let complexity = CharacterClassFlags::from_password(pwd).count();

    let base = 20.0 * oracle_score(pwd) as f64;

    let length_bonus = match length {
        l if l > 16 => 10.0,
        l if l > 12 => 8.0,
        l if l > 8 => 5.0,
        l if l > 6 => 2.0,
        _ => 0.0,
    };
    let bonus = length_bonus + 1.5 * complexity as f64;

    let penalties = collect_penalties(password, &[SHARED_SECTIONS]);
    let penalty: f64 = penalties.iter().map(|p| p.points as f64).sum();

    // Fractional bonuses are floored after clamping.
    let total = (base + bonus - penalty).clamp(0.0, StrengthScore::MAX as f64);

    ScoreBreakdown {
        score: StrengthScore::new(total.floor() as i64),
        branch: ScoringBranch::Fallback,
        base,
        bonus,
        penalties,
    }
}

/// zxcvbn's 0-4 strength score.
pub(crate) fn oracle_score(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    match zxcvbn::zxcvbn(password, &[]).score() {
        Score::Zero => 0,
        Score::One => 1,
        Score::Two => 2,
        Score::Three => 3,
        Score::Four => 4,
        #[allow(unreachable_patterns)]
        _ => 0,
    }
}

/// Estimated entropy in bits, from zxcvbn's guess count.
pub fn entropy_bits(password: &str) -> f64 {
    if password.is_empty() {
        return 0.0;
    }
    let bits = zxcvbn::zxcvbn(password, &[]).guesses_log10() * std::f64::consts::LOG2_10;
    (bits * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::{FixedClassifier, length_model_json};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn fixed(answer: Result<bool, ClassifierError>) -> Scorer {
        Scorer::with_classifier(Arc::new(FixedClassifier(answer)))
    }

    #[test]
    fn test_strong_prediction_base_and_penalties() {
        // 10 chars, 4 classes: base = min(100, 60 + 20 + 20) = 100, no penalties
        let breakdown = fixed(Ok(true)).breakdown(&secret("Zq9!mV#2kW"));
        assert_eq!(breakdown.branch, ScoringBranch::Classifier);
        assert_eq!(breakdown.base, 100.0);
        assert!(breakdown.penalties.is_empty(), "{:?}", breakdown.penalties);
        assert_eq!(breakdown.score.value(), 100);
    }

    #[test]
    fn test_weak_prediction_base() {
        // base = max(0, 20 - 5) = 15; penalties: lowercase only 10, short 15,
        // no digits 10, no symbols 5
        let breakdown = fixed(Ok(false)).breakdown(&secret("zqmvk"));
        assert_eq!(breakdown.base, 15.0);
        assert_eq!(breakdown.total_penalty(), 40);
        assert_eq!(breakdown.score.value(), 0);
    }

    #[test]
    fn test_classifier_branch_uppercase_digits_penalty() {
        // 12 chars, upper + digit: base = min(100, 60 + 24 + 10) = 94
        // penalties: no symbols 5, uppercase+digits 30
        let breakdown = fixed(Ok(true)).breakdown(&secret("QZMVKWXR7359"));
        assert_eq!(breakdown.base, 94.0);
        assert_eq!(breakdown.total_penalty(), 35);
        assert_eq!(breakdown.score.value(), 59);
    }

    #[test]
    fn test_banned_term_drops_score_by_at_least_fifty() {
        let scorer = fixed(Ok(true));
        let with_term = scorer.score(&secret("mybarclaysacct99Q!"));
        let without_term = scorer.score(&secret("myacct99Q!"));
        assert!(
            without_term.value() as i32 - with_term.value() as i32 >= 50,
            "with: {}, without: {}",
            with_term,
            without_term
        );
    }

    #[test]
    fn test_inference_failure_falls_back_for_the_call() {
        let scorer = fixed(Err(ClassifierError::Inference("boom".to_string())));
        assert!(scorer.is_classifier_available());
        let breakdown = scorer.breakdown(&secret("Zq9!mV#2kW"));
        assert_eq!(breakdown.branch, ScoringBranch::Fallback);
    }

    #[test]
    fn test_predict_requires_a_classifier() {
        let pwd = secret("anything");
        assert_eq!(
            Scorer::rule_only().predict(&pwd),
            Err(ClassifierError::ModelUnavailable)
        );
        assert_eq!(fixed(Ok(true)).predict(&pwd), Ok(true));
    }

    #[test]
    fn test_fallback_common_password() {
        // base 0, bonus 1.5, penalties: digits only 15, ultra common 20,
        // numeric run 10, banned "123" 50
        let breakdown = Scorer::rule_only().breakdown(&secret("123456"));
        assert_eq!(breakdown.branch, ScoringBranch::Fallback);
        assert_eq!(breakdown.bonus, 1.5);
        assert_eq!(breakdown.total_penalty(), 95);
        assert_eq!(breakdown.score.value(), 0);
    }

    #[test]
    fn test_fallback_strong_password() {
        let score = Scorer::rule_only().score(&secret("Tr0ub4dor&3Zx9!"));
        assert!(score.value() >= 60, "score was {}", score);
    }

    #[test]
    fn test_fallback_skips_classifier_only_penalties() {
        // short, no symbols and uppercase+digits only apply to the classifier path
        let pwd = secret("HELLO1");
        assert!(Scorer::rule_only().breakdown(&pwd).penalties.is_empty());
        assert_eq!(fixed(Ok(true)).breakdown(&pwd).total_penalty(), 50);
    }

    #[test]
    fn test_empty_password_scores_zero() {
        assert_eq!(Scorer::rule_only().score(&secret("")).value(), 0);
        // base 60; short 15, no letters 20, no digits 10, no symbols 5
        assert_eq!(fixed(Ok(true)).score(&secret("")).value(), 10);
    }

    #[test]
    fn test_from_model_path() {
        assert!(!Scorer::from_model_path("/nonexistent/model.json").is_classifier_available());

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "{}", length_model_json()).expect("Failed to write");
        let scorer = Scorer::from_model_path(temp_file.path());
        assert!(scorer.is_classifier_available());
        assert_eq!(
            scorer.breakdown(&secret("Zq9!mV#2kW")).branch,
            ScoringBranch::Classifier
        );
    }

    #[test]
    fn test_entropy_bits() {
        assert_eq!(entropy_bits(""), 0.0);
        assert!(entropy_bits("Tr0ub4dor&3Zx9!") > entropy_bits("abc"));
    }
}
