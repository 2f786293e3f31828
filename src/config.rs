//! Engine configuration, read from environment variables.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

use crate::classifier::{DEFAULT_MODEL_PATH, get_model_path};

pub const DEFAULT_HASHCAT_BIN: &str = "hashcat";
pub const DEFAULT_AI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-3.5-turbo";

/// Settings for the brute-force tool integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashcatConfig {
    pub enabled: bool,
    pub binary: PathBuf,
    /// Budget handed to the tool itself (`--runtime`).
    pub runtime: Duration,
    /// Hard limit after which the process is killed.
    pub timeout: Duration,
}

impl Default for HashcatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: PathBuf::from(DEFAULT_HASHCAT_BIN),
            runtime: Duration::from_secs(10),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Settings for the AI advisor. No API key means the advisor is off.
#[derive(Debug)]
pub struct AdvisorConfig {
    pub api_key: Option<SecretString>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl AdvisorConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

#[derive(Debug)]
pub struct EngineConfig {
    pub model_path: PathBuf,
    pub hashcat: HashcatConfig,
    pub advisor: AdvisorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            hashcat: HashcatConfig::default(),
            advisor: AdvisorConfig::default(),
        }
    }
}

fn env_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"),
        Err(_) => default,
    }
}

impl EngineConfig {
    /// Builds the configuration from the environment.
    ///
    /// Recognized variables: `PWD_MODEL_PATH`, `PWD_HASHCAT_ENABLED`,
    /// `PWD_HASHCAT_BIN`, `PWD_HASHCAT_RUNTIME_SECS`, `PWD_HASHCAT_TIMEOUT_SECS`,
    /// `OPENAI_API_KEY`, `PWD_AI_ENDPOINT`, `PWD_AI_MODEL`, `PWD_AI_TIMEOUT_SECS`.
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let hashcat = HashcatConfig {
            enabled: env_flag("PWD_HASHCAT_ENABLED", defaults.hashcat.enabled),
            binary: std::env::var("PWD_HASHCAT_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.hashcat.binary),
            runtime: env_secs("PWD_HASHCAT_RUNTIME_SECS", defaults.hashcat.runtime),
            timeout: env_secs("PWD_HASHCAT_TIMEOUT_SECS", defaults.hashcat.timeout),
        };

        let advisor = AdvisorConfig {
            api_key: std::env::var("OPENAI_API_KEY").ok().map(SecretString::from),
            endpoint: std::env::var("PWD_AI_ENDPOINT").unwrap_or(defaults.advisor.endpoint),
            model: std::env::var("PWD_AI_MODEL").unwrap_or(defaults.advisor.model),
            timeout: env_secs("PWD_AI_TIMEOUT_SECS", defaults.advisor.timeout),
        };

        Self {
            model_path: get_model_path(),
            hashcat,
            advisor,
        }
    }
}
