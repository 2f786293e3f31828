//! Password evaluator - assembles the full result for one password.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

#[cfg(feature = "async")]
use crate::advisor::{AiSuggestion, OpenAiAdvisor, PasswordProfile, SuggestionAdvisor, request_advice};
use crate::composition::{Composition, analyze_composition};
use crate::config::EngineConfig;
use crate::crack_time::{CrackTimeEstimate, estimate};
#[cfg(feature = "async")]
use crate::cracker::{CrackAttempt, CrackSimulation, adapter_from_config, simulate_cracking};
use crate::patterns::{Pattern, detect_patterns};
use crate::scorer::{ScoreBreakdown, Scorer, entropy_bits};
use crate::strength::{StrengthCategory, StrengthScore};
use crate::suggestions::{RuleSuggestions, SecurityLevel, suggest};

/// Widely used passwords scored alongside every evaluation, for comparison.
pub const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "123456789", "qwerty", "12345", "12345678", "111111", "123123",
    "admin", "welcome", "password1", "1234", "P@ssw0rd", "letmein", "abc123", "monkey",
    "sunshine", "football", "iloveyou", "123", "welcome1", "passw0rd", "zaq1zaq1", "1qaz2wsx",
    "qwertyuiop", "asdfghjkl", "login", "123qwe", "trustno1",
];

#[cfg(feature = "async")]
const DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(300);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Where the suggestions came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Suggestions {
    RuleBased(RuleSuggestions),
    #[cfg(feature = "async")]
    Ai(AiSuggestion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommonPasswordScore {
    pub password: &'static str,
    pub score: StrengthScore,
}

/// Complete result of evaluating one password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub score: StrengthScore,
    pub category: StrengthCategory,
    pub color: &'static str,
    pub entropy_bits: f64,
    /// Charset size, combinations, crack times and the dictionary estimate.
    #[serde(flatten)]
    pub crack: CrackTimeEstimate,
    pub composition: Composition,
    pub patterns: Vec<Pattern>,
    pub breakdown: ScoreBreakdown,
    pub suggestions: Suggestions,
    pub common_passwords: Vec<CommonPasswordScore>,
    /// Set by the async path only.
    #[cfg(feature = "async")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<CrackSimulation>,
}

impl Evaluation {
    pub fn to_json(&self) -> Result<String, EvaluationError> {
        serde_json::to_string(self).map_err(|e| EvaluationError::Internal(e.to_string()))
    }
}

/// Result delivered by [`Evaluator::evaluate_tx`].
#[cfg(feature = "async")]
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Completed(Box<Evaluation>),
    Cancelled,
}

/// Scoring engine plus configuration. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Evaluator {
    scorer: Scorer,
    config: EngineConfig,
    benchmarks: OnceLock<Vec<CommonPasswordScore>>,
}

impl Evaluator {
    pub fn new(scorer: Scorer, config: EngineConfig) -> Self {
        Self {
            scorer,
            config,
            benchmarks: OnceLock::new(),
        }
    }

    /// Loads the classifier from `config.model_path`; rule-only when absent.
    pub fn from_config(config: EngineConfig) -> Self {
        let scorer = Scorer::from_model_path(&config.model_path);
        Self::new(scorer, config)
    }

    pub fn from_env() -> Self {
        Self::from_config(EngineConfig::from_env())
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scores of [`COMMON_PASSWORDS`], computed once per evaluator.
    pub fn common_password_scores(&self) -> &[CommonPasswordScore] {
        self.benchmarks.get_or_init(|| {
            COMMON_PASSWORDS
                .iter()
                .map(|&password| CommonPasswordScore {
                    password,
                    score: self
                        .scorer
                        .score(&SecretString::new(password.to_string().into())),
                })
                .collect()
        })
    }

    /// Evaluates a password locally, without the external integrations.
    ///
    /// # Errors
    ///
    /// [`EvaluationError::InvalidInput`] for an empty password or a security
    /// level outside `1..=5`.
    pub fn evaluate(
        &self,
        password: &SecretString,
        level: SecurityLevel,
    ) -> Result<Evaluation, EvaluationError> {
        validate(password, level)?;
        let pwd = password.expose_secret();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Evaluating password of length {} at security level {}",
            pwd.chars().count(),
            level.value()
        );

        let breakdown = self.scorer.breakdown(password);
        let score = breakdown.score;
        let category = score.category();

        Ok(Evaluation {
            score,
            category,
            color: category.color(),
            entropy_bits: entropy_bits(pwd),
            crack: estimate(pwd),
            composition: analyze_composition(pwd),
            patterns: detect_patterns(pwd),
            breakdown,
            suggestions: Suggestions::RuleBased(suggest(pwd, level)),
            common_passwords: self.common_password_scores().to_vec(),
            #[cfg(feature = "async")]
            simulation: None,
        })
    }

    /// Evaluates a password and consults the configured brute-force tool and
    /// AI advisor. Failures of either fall back silently.
    #[cfg(feature = "async")]
    pub async fn evaluate_async(
        &self,
        password: &SecretString,
        level: SecurityLevel,
    ) -> Result<Evaluation, EvaluationError> {
        let cracker = adapter_from_config(&self.config.hashcat);
        let advisor = if self.config.advisor.is_enabled() {
            match OpenAiAdvisor::from_config(&self.config.advisor) {
                Ok(advisor) => Some(advisor),
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("AI advisor could not be built: {}", _e);
                    None
                }
            }
        } else {
            None
        };
        self.evaluate_with(password, level, cracker.as_ref(), advisor.as_ref())
            .await
    }

    /// [`Evaluator::evaluate_async`] with explicit integrations.
    #[cfg(feature = "async")]
    pub async fn evaluate_with<C: CrackAttempt, A: SuggestionAdvisor>(
        &self,
        password: &SecretString,
        level: SecurityLevel,
        cracker: Option<&C>,
        advisor: Option<&A>,
    ) -> Result<Evaluation, EvaluationError> {
        let mut evaluation = self.evaluate(password, level)?;

        evaluation.simulation = Some(match cracker {
            Some(cracker) => {
                simulate_cracking(cracker, password, self.config.hashcat.timeout).await
            }
            None => CrackSimulation::Estimated,
        });

        if let Some(advisor) = advisor {
            let profile = PasswordProfile::from_password(password, level);
            if let Some(ai) = request_advice(advisor, &profile).await {
                evaluation.suggestions = Suggestions::Ai(ai);
            }
        }

        Ok(evaluation)
    }

    /// Debounced evaluation delivered over a channel.
    ///
    /// Waits 300 ms, then runs [`Evaluator::evaluate_async`]. Cancelling
    /// `token` at any point delivers [`EvaluationOutcome::Cancelled`].
    #[cfg(feature = "async")]
    pub async fn evaluate_tx(
        &self,
        password: &SecretString,
        level: SecurityLevel,
        token: CancellationToken,
        tx: mpsc::Sender<Result<EvaluationOutcome, EvaluationError>>,
    ) {
        #[cfg(feature = "tracing")]
        tracing::info!("evaluation is about to start...");

        let outcome = tokio::select! {
            _ = token.cancelled() => Ok(EvaluationOutcome::Cancelled),
            result = async {
                tokio::time::sleep(DEBOUNCE).await;
                self.evaluate_async(password, level).await
            } => result.map(|e| EvaluationOutcome::Completed(Box::new(e))),
        };

        if let Err(_e) = tx.send(outcome).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to send password evaluation result: {}", _e);
        }
    }
}

fn validate(password: &SecretString, level: SecurityLevel) -> Result<(), EvaluationError> {
    if password.expose_secret().is_empty() {
        return Err(EvaluationError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    if !level.is_recognized() {
        return Err(EvaluationError::InvalidInput(format!(
            "security level {} is outside {}..={}",
            level.value(),
            SecurityLevel::MIN,
            SecurityLevel::MAX
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::offline_evaluator;
    use super::*;
    use crate::classifier::ClassifierError;
    use crate::classifier::test_support::FixedClassifier;
    use crate::crack_time::Complexity;
    use crate::scorer::ScoringBranch;
    use std::sync::Arc;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn level(n: u8) -> SecurityLevel {
        SecurityLevel::new(n)
    }

    #[test]
    fn test_evaluate_common_numeric_password() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let evaluation = evaluator
            .evaluate(&secret("123456"), level(3))
            .expect("valid input");

        assert!(evaluation.score.value() < 20);
        assert_eq!(evaluation.category, StrengthCategory::VeryWeak);
        assert_eq!(evaluation.color, "#FF0000");
        assert!(
            evaluation
                .breakdown
                .penalties
                .iter()
                .any(|p| p.reason == "Password contains a banned term")
        );
        assert!(evaluation.patterns.iter().any(|p| matches!(
            p,
            Pattern::NumericalSequence | Pattern::CommonWord
        )));
        assert_eq!(evaluation.crack.complexity, Complexity::Weak);
    }

    #[test]
    fn test_evaluate_strong_password() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let evaluation = evaluator
            .evaluate(&secret("Tr0ub4dor&3Zx9!"), level(3))
            .expect("valid input");

        assert!(evaluation.score.value() >= 60, "got {}", evaluation.score);
        assert!(matches!(
            evaluation.category,
            StrengthCategory::Strong | StrengthCategory::VeryStrong
        ));
        assert!(evaluation.patterns.len() <= 1);
        assert_eq!(evaluation.breakdown.branch, ScoringBranch::Fallback);
    }

    #[test]
    fn test_evaluate_without_model_file() {
        let config = EngineConfig {
            model_path: "/nonexistent/path/model.json".into(),
            ..EngineConfig::default()
        };
        let evaluator = Evaluator::from_config(config);
        assert!(!evaluator.scorer().is_classifier_available());

        let evaluation = evaluator
            .evaluate(&secret("correct horse"), level(2))
            .expect("rule-only evaluation succeeds");
        assert_eq!(evaluation.breakdown.branch, ScoringBranch::Fallback);
        assert!(evaluation.score.value() <= 100);
    }

    #[test]
    fn test_evaluate_rejects_invalid_input() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        assert!(matches!(
            evaluator.evaluate(&secret(""), level(3)),
            Err(EvaluationError::InvalidInput(_))
        ));
        for bad in [0, 6] {
            assert!(matches!(
                evaluator.evaluate(&secret("abc"), level(bad)),
                Err(EvaluationError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_evaluate_with_classifier() {
        let scorer = Scorer::with_classifier(Arc::new(FixedClassifier(Ok(true))));
        let evaluator = offline_evaluator(scorer);
        let evaluation = evaluator
            .evaluate(&secret("Zq9!mV#2kW"), level(3))
            .expect("valid input");
        assert_eq!(evaluation.breakdown.branch, ScoringBranch::Classifier);
        assert_eq!(evaluation.score.value(), 100);
        assert_eq!(evaluation.category, StrengthCategory::VeryStrong);
    }

    #[test]
    fn test_evaluate_with_failing_classifier_falls_back() {
        let scorer = Scorer::with_classifier(Arc::new(FixedClassifier(Err(
            ClassifierError::Inference("boom".to_string()),
        ))));
        let evaluation = offline_evaluator(scorer)
            .evaluate(&secret("Zq9!mV#2kW"), level(3))
            .expect("inference failure is not a caller error");
        assert_eq!(evaluation.breakdown.branch, ScoringBranch::Fallback);
    }

    #[test]
    fn test_rule_based_suggestions_present() {
        let evaluation = offline_evaluator(Scorer::rule_only())
            .evaluate(&secret("abc"), level(5))
            .expect("valid input");
        match evaluation.suggestions {
            Suggestions::RuleBased(s) => {
                assert_eq!(s.alternatives.len(), 3);
                assert!(s.alternatives.iter().all(|a| a.chars().count() == 18));
                assert!(!s.weaknesses.is_empty());
            }
            #[allow(unreachable_patterns)]
            _ => panic!("expected rule-based suggestions"),
        }
    }

    #[test]
    fn test_common_password_scores_use_same_scorer() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let scores = evaluator.common_password_scores();
        assert_eq!(scores.len(), COMMON_PASSWORDS.len());
        let first = scores[0];
        assert_eq!(first.password, "123456");
        assert_eq!(first.score, evaluator.scorer().score(&secret("123456")));
        assert!(scores[1].score.value() < 20, "password scored {}", scores[1].score);
    }

    #[test]
    fn test_json_payload_shape() {
        let evaluation = offline_evaluator(Scorer::rule_only())
            .evaluate(&secret("Aa1!"), level(1))
            .expect("valid input");
        let json = evaluation.to_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["combinations"], "81450625");
        assert_eq!(value["charset_size"], 95);
        assert!(value["crack_times"]["offline_fast_hash"].is_string());
        assert!(value["visualization_times"]["quantum_computer"].is_string());
        assert_eq!(value["suggestions"]["source"], "rule_based");
        assert_eq!(value["category"], evaluation.category.label());
        assert!(!json.contains("\"Aa1!\""));
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::test_support::offline_evaluator;
    use super::*;
    use crate::advisor::test_support::StubAdvisor;
    use crate::cracker::test_support::StubCracker;
    use crate::cracker::{CrackResult, HashcatAdapter};

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[tokio::test]
    async fn test_evaluate_async_offline_uses_estimation() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let evaluation = evaluator
            .evaluate_async(&secret("TestPass123!"), SecurityLevel::default())
            .await
            .expect("valid input");
        assert_eq!(evaluation.simulation, Some(CrackSimulation::Estimated));
        assert!(matches!(evaluation.suggestions, Suggestions::RuleBased(_)));
    }

    #[tokio::test]
    async fn test_evaluate_with_integrations() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let cracker = StubCracker(|| {
            Ok(CrackResult::Recovered {
                hash_rate: Some(2000.0),
            })
        });
        let advisor = StubAdvisor(Some("Use a longer passphrase."));

        let evaluation = evaluator
            .evaluate_with(&secret("abc"), SecurityLevel::default(), Some(&cracker), Some(&advisor))
            .await
            .expect("valid input");

        assert!(matches!(
            evaluation.simulation,
            Some(CrackSimulation::Empirical { hash_rate, .. }) if hash_rate == 2000.0
        ));
        assert!(matches!(
            evaluation.suggestions,
            Suggestions::Ai(ref s) if s.advice == "Use a longer passphrase."
        ));
    }

    #[tokio::test]
    async fn test_failed_advisor_keeps_rule_based() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let evaluation = evaluator
            .evaluate_with(
                &secret("abc"),
                SecurityLevel::default(),
                None::<&HashcatAdapter>,
                Some(&StubAdvisor(None)),
            )
            .await
            .expect("valid input");
        assert!(matches!(evaluation.suggestions, Suggestions::RuleBased(_)));
        assert_eq!(evaluation.simulation, Some(CrackSimulation::Estimated));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_tx_delivers_result() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();

        evaluator
            .evaluate_tx(&secret("TestPass123!"), SecurityLevel::default(), token, tx)
            .await;

        let outcome = rx.recv().await.expect("Should receive evaluation");
        assert!(matches!(outcome, Ok(EvaluationOutcome::Completed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_tx_cancelled_before_start() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        evaluator
            .evaluate_tx(&secret("TestPass123!"), SecurityLevel::default(), token, tx)
            .await;

        assert_eq!(rx.recv().await, Some(Ok(EvaluationOutcome::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_tx_cancelled_during_debounce() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();

        let canceller = token.clone();
        let cancel_task = async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            canceller.cancel();
        };
        let pwd = secret("TestPass123!");
        let eval_task = evaluator.evaluate_tx(&pwd, SecurityLevel::default(), token, tx);
        tokio::join!(cancel_task, eval_task);

        assert_eq!(rx.recv().await, Some(Ok(EvaluationOutcome::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_tx_reports_invalid_input() {
        let evaluator = offline_evaluator(Scorer::rule_only());
        let (tx, mut rx) = mpsc::channel(1);

        evaluator
            .evaluate_tx(&secret(""), SecurityLevel::default(), CancellationToken::new(), tx)
            .await;

        assert!(matches!(
            rx.recv().await,
            Some(Err(EvaluationError::InvalidInput(_)))
        ));
    }
}
