//! Live brute-force attempt through an external cracking tool.
//!
//! The tool only ever sees a SHA-256 digest of the password, written to a
//! temporary file that is removed when the attempt ends. Every failure mode
//! (tool missing, non-zero exit, timeout) degrades to the pure estimate.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::charset::keyspace;
use crate::config::HashcatConfig;
use crate::crack_time::{average_seconds, format_scenario_time};

/// Hash mode for SHA-256.
const HASH_MODE: &str = "1400";
/// Brute-force (mask) attack.
const ATTACK_MODE: &str = "3";
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Rate assumed when the tool recovers the password but prints no speed.
const DEFAULT_HASH_RATE: f64 = 1000.0;

/// What the tool is asked to crack: a digest, never the password itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackTarget {
    digest: String,
}

impl CrackTarget {
    pub fn from_password(password: &SecretString) -> Self {
        let digest = Sha256::digest(password.expose_secret().as_bytes());
        Self {
            digest: hex::encode(digest),
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CrackResult {
    Recovered { hash_rate: Option<f64> },
    NotRecovered,
}

#[derive(Error, Debug)]
pub enum CrackError {
    #[error("Cracking tool is not available")]
    Unavailable,
    #[error("Failed to run cracking tool: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cracking tool timed out after {0:?}")]
    Timeout(Duration),
}

/// A single bounded cracking attempt. Implementations must return within
/// `timeout`.
pub trait CrackAttempt: Send + Sync {
    fn attempt_crack(
        &self,
        target: &CrackTarget,
        timeout: Duration,
    ) -> impl Future<Output = Result<CrackResult, CrackError>> + Send;
}

/// Runs `hashcat` as a subprocess.
#[derive(Debug, Clone)]
pub struct HashcatAdapter {
    binary: PathBuf,
    runtime: Duration,
}

impl HashcatAdapter {
    pub fn new(config: &HashcatConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            runtime: config.runtime,
        }
    }

    /// Probes `--version`; anything but a clean exit within 5 seconds means unavailable.
    pub async fn is_available(&self) -> bool {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        match tokio::time::timeout(VERSION_PROBE_TIMEOUT, cmd.status()).await {
            Ok(Ok(status)) => status.success(),
            _ => false,
        }
    }

    async fn run(&self, target: &CrackTarget) -> Result<CrackResult, CrackError> {
        let mut hash_file = tempfile::NamedTempFile::new()?;
        writeln!(hash_file, "{}", target.digest())?;
        hash_file.flush()?;

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-m", HASH_MODE, "-a", ATTACK_MODE, "--quiet", "--potfile-disable"])
            .arg("--runtime")
            .arg(self.runtime.as_secs().max(1).to_string())
            .arg(hash_file.path())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = cmd.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_output(&stdout, output.status.success(), target))
    }
}

impl CrackAttempt for HashcatAdapter {
    async fn attempt_crack(
        &self,
        target: &CrackTarget,
        timeout: Duration,
    ) -> Result<CrackResult, CrackError> {
        // The availability probe counts against the same budget as the run.
        let attempt = async {
            if !self.is_available().await {
                return Err(CrackError::Unavailable);
            }
            self.run(target).await
        };
        tokio::time::timeout(timeout, attempt)
            .await
            .map_err(|_| CrackError::Timeout(timeout))?
    }
}

/// Interprets tool output. The recovered plaintext, if printed, is not kept.
fn parse_output(stdout: &str, success: bool, target: &CrackTarget) -> CrackResult {
    let recovered = success
        && (stdout.contains("Recovered") || stdout.contains(&format!("{}:", target.digest())));
    if recovered {
        CrackResult::Recovered {
            hash_rate: parse_hash_rate(stdout),
        }
    } else {
        CrackResult::NotRecovered
    }
}

/// Finds the first `<number> [k|M|G|T]H/s` figure.
fn parse_hash_rate(text: &str) -> Option<f64> {
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find("H/s") {
        let end = search_from + pos;
        search_from = end + 3;

        let head = &text[..end];
        let (head, multiplier) = match head.chars().last() {
            Some('k') => (&head[..head.len() - 1], 1e3),
            Some('M') => (&head[..head.len() - 1], 1e6),
            Some('G') => (&head[..head.len() - 1], 1e9),
            Some('T') => (&head[..head.len() - 1], 1e12),
            _ => (head, 1.0),
        };
        let head = head.trim_end();
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if let Ok(value) = head[start..].parse::<f64>() {
            return Some(value * multiplier);
        }
    }
    None
}

/// Outcome reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CrackSimulation {
    /// The tool recovered the password; times are re-estimated at its observed rate.
    Empirical {
        hash_rate: f64,
        estimated_time: String,
    },
    /// The tool was unavailable or unsuccessful; see the pure estimate.
    Estimated,
}

/// Runs one bounded attempt and converts any failure into [`CrackSimulation::Estimated`].
pub async fn simulate_cracking<C: CrackAttempt>(
    cracker: &C,
    password: &SecretString,
    timeout: Duration,
) -> CrackSimulation {
    let target = CrackTarget::from_password(password);
    match cracker.attempt_crack(&target, timeout).await {
        Ok(CrackResult::Recovered { hash_rate }) => {
            let hash_rate = hash_rate.filter(|r| *r > 0.0).unwrap_or(DEFAULT_HASH_RATE);
            let seconds = average_seconds(&keyspace(password.expose_secret()), hash_rate);
            CrackSimulation::Empirical {
                hash_rate,
                estimated_time: format_scenario_time(seconds),
            }
        }
        Ok(CrackResult::NotRecovered) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Cracking tool did not recover the password, using estimation");
            CrackSimulation::Estimated
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Cracking simulation failed: {}, using estimation", _e);
            CrackSimulation::Estimated
        }
    }
}

/// Resolves whether the configured tool should be used at all.
pub fn adapter_from_config(config: &HashcatConfig) -> Option<HashcatAdapter> {
    config.enabled.then(|| HashcatAdapter::new(config))
}
