//! Optional AI-generated advice.
//!
//! Only a [`PasswordProfile`] (derived metadata) is ever sent to the service.
//! Any failure is reported to the evaluator, which then uses the rule-based
//! suggestions in full.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::charset::CharacterClassFlags;
use crate::config::AdvisorConfig;
use crate::patterns::{Pattern, detect_patterns};
use crate::suggestions::SecurityLevel;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 300;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("No API key configured")]
    MissingCredential,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned status {0}")]
    Status(u16),
    #[error("Service response has no completion")]
    EmptyCompletion,
    #[error("Failed to encode password profile: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What the advisor is allowed to know about a password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordProfile {
    pub length: usize,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_digits: bool,
    pub has_special: bool,
    pub patterns: Vec<Pattern>,
    pub security_level: SecurityLevel,
}

impl PasswordProfile {
    pub fn from_password(password: &SecretString, level: SecurityLevel) -> Self {
        let pwd = password.expose_secret();
        let flags = CharacterClassFlags::from_password(pwd);
        Self {
            length: pwd.chars().count(),
            has_lowercase: flags.has_lower,
            has_uppercase: flags.has_upper,
            has_digits: flags.has_digit,
            has_special: flags.has_symbol,
            patterns: detect_patterns(pwd),
            security_level: level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiSuggestion {
    pub advice: String,
    pub generated_by: String,
}

pub trait SuggestionAdvisor: Send + Sync {
    fn advise(
        &self,
        profile: &PasswordProfile,
    ) -> impl Future<Output = Result<AiSuggestion, AdvisorError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatCompletion,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    content: Option<String>,
}

/// Chat-completions client.
#[derive(Debug)]
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = match &config.api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => {
                SecretString::from(key.expose_secret().to_string())
            }
            _ => return Err(AdvisorError::MissingCredential),
        };

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn request_body(&self, profile: &PasswordProfile) -> Result<ChatRequest<'_>, AdvisorError> {
        let level = profile.security_level.description();
        let characteristics = serde_json::to_string(profile)?;
        Ok(ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: format!(
                        "You are a password security expert. You'll be given characteristics of a \
                         password (not the actual password) and need to provide advice on improving \
                         it and suggest three stronger alternatives. The user has requested a {} \
                         security level.",
                        level
                    ),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Password characteristics: {}. Provide advice on why this password might be \
                         weak and suggest three stronger alternatives that match the requested \
                         security level ({}).",
                        characteristics, level
                    ),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })
    }
}

impl SuggestionAdvisor for OpenAiAdvisor {
    async fn advise(&self, profile: &PasswordProfile) -> Result<AiSuggestion, AdvisorError> {
        let body = self.request_body(profile)?;

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AdvisorError::Status(resp.status().as_u16()));
        }

        let parsed: ChatResponse = resp.json().await?;
        let advice = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AdvisorError::EmptyCompletion)?;

        Ok(AiSuggestion {
            advice,
            generated_by: format!("OpenAI {}", self.model),
        })
    }
}

/// Asks `advisor` once; `None` on any failure.
pub async fn request_advice<A: SuggestionAdvisor>(
    advisor: &A,
    profile: &PasswordProfile,
) -> Option<AiSuggestion> {
    match advisor.advise(profile).await {
        Ok(suggestion) => Some(suggestion),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("AI advisor failed: {}, using rule-based suggestions", _e);
            None
        }
    }
}
