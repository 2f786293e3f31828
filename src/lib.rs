//! Password strength scoring library
//!
//! Scores a password from 0 to 100, estimates how long it would take to
//! crack under several attacker models, and suggests improvements.
//!
//! The score comes from a trained binary classifier when a model artifact is
//! available, and from a zxcvbn-based heuristic otherwise. Either way a fixed
//! set of penalty rules is applied on top.
//!
//! # Features
//!
//! - `async` (default): Enables async evaluation with cancellation support,
//!   the brute-force tool adapter and the AI advisor
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_MODEL_PATH`: Custom path to the classifier artifact
//!   (default: `./models/password_classifier.json`)
//! - `PWD_HASHCAT_ENABLED`, `PWD_HASHCAT_BIN`, `PWD_HASHCAT_RUNTIME_SECS`,
//!   `PWD_HASHCAT_TIMEOUT_SECS`: brute-force tool settings
//! - `OPENAI_API_KEY`, `PWD_AI_ENDPOINT`, `PWD_AI_MODEL`, `PWD_AI_TIMEOUT_SECS`:
//!   AI advisor settings
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_insight::{Evaluator, SecurityLevel};
//! use secrecy::SecretString;
//!
//! // Load configuration and the classifier (if present) once at startup
//! let evaluator = Evaluator::from_env();
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let evaluation = evaluator
//!     .evaluate(&password, SecurityLevel::new(3))
//!     .expect("non-empty password and valid level");
//!
//! println!("Score: {}", evaluation.score);
//! println!("Strength: {}", evaluation.category);
//! println!("Offline fast hash: {}", evaluation.crack.crack_times["offline_fast_hash"]);
//! ```

// Internal modules
#[cfg(feature = "async")]
mod advisor;
mod charset;
mod classifier;
mod composition;
mod config;
mod crack_time;
#[cfg(feature = "async")]
mod cracker;
mod evaluator;
mod features;
mod patterns;
mod scorer;
mod sections;
mod strength;
mod suggestions;

// Public API
pub use charset::{CharacterClassFlags, charset_size, keyspace};
pub use classifier::{
    ClassifierError, ClassifierModel, ModelError, StrengthClassifier, get_model_path,
    load_optional,
};
pub use composition::{ClassShare, Composition, analyze_composition};
pub use config::{AdvisorConfig, EngineConfig, HashcatConfig};
pub use crack_time::{
    AttackProfile, Complexity, CrackTimeEstimate, DictionaryEstimate, DictionaryTier,
    SATURATED_TIME, SCENARIO_PROFILES, VISUALIZATION_PROFILES, estimate, format_scenario_time,
    format_visualization_time,
};
pub use evaluator::{
    COMMON_PASSWORDS, CommonPasswordScore, Evaluation, EvaluationError, Evaluator, Suggestions,
};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use patterns::{Pattern, detect_patterns};
pub use scorer::{ScoreBreakdown, Scorer, ScoringBranch, ScoringStrategy, entropy_bits};
pub use sections::Penalty;
pub use strength::{StrengthCategory, StrengthScore};
pub use suggestions::{
    ALTERNATIVE_COUNT, RuleSuggestions, SecurityLevel, generate_alternatives, suggest,
    suggest_with_rng,
};

#[cfg(feature = "async")]
pub use advisor::{AdvisorError, AiSuggestion, OpenAiAdvisor, PasswordProfile, SuggestionAdvisor};
#[cfg(feature = "async")]
pub use cracker::{
    CrackAttempt, CrackError, CrackResult, CrackSimulation, CrackTarget, HashcatAdapter,
    simulate_cracking,
};
#[cfg(feature = "async")]
pub use evaluator::EvaluationOutcome;
