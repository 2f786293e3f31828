//! Binary strength classifier.
//!
//! Loads a pre-trained soft-voting forest from a JSON artifact and predicts
//! whether a password belongs to the "strong" class. The artifact is read-only
//! once loaded; the scorer holds it behind an `Arc` and shares it freely.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

pub(crate) const DEFAULT_MODEL_PATH: &str = "./models/password_classifier.json";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read model file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Model file is empty")]
    EmptyFile,
    #[error("Failed to parse model file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Model file is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Classifier model is not available")]
    ModelUnavailable,
    #[error("Classifier inference failed: {0}")]
    Inference(String),
}

/// Anything that can label a password strong or weak.
///
/// Implementations must be read-only: the same input always yields the same
/// answer and concurrent calls are allowed.
pub trait StrengthClassifier: Send + Sync {
    /// Returns `true` for the "strong" class.
    fn predict(&self, password: &str) -> Result<bool, ClassifierError>;
}

/// Returns the model artifact path.
///
/// Priority:
/// 1. Environment variable `PWD_MODEL_PATH`
/// 2. Default path `./models/password_classifier.json`
pub fn get_model_path() -> PathBuf {
    std::env::var("PWD_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        p_strong: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Walks from the root to a leaf. Bounded by the node count so a cyclic
    /// tree fails instead of spinning.
    fn leaf_probability(&self, row: &[f64; FEATURE_COUNT]) -> Result<f64, ClassifierError> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { p_strong }) => return Ok(*p_strong),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ClassifierError::Inference(format!(
                        "node index {} out of range",
                        index
                    )));
                }
            }
        }
        Err(ClassifierError::Inference(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }

    fn validate(&self, tree_index: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Corrupt(format!("tree {} has no nodes", tree_index)));
        }
        for node in &self.nodes {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ModelError::Corrupt(format!(
                            "tree {} references feature {}",
                            tree_index, feature
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::Corrupt(format!(
                            "tree {} has a NaN threshold",
                            tree_index
                        )));
                    }
                    if *left >= self.nodes.len() || *right >= self.nodes.len() {
                        return Err(ModelError::Corrupt(format!(
                            "tree {} has a child index out of range",
                            tree_index
                        )));
                    }
                }
                Node::Leaf { p_strong } => {
                    if !(0.0..=1.0).contains(p_strong) {
                        return Err(ModelError::Corrupt(format!(
                            "tree {} has leaf probability {}",
                            tree_index, p_strong
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Artifact {
    feature_names: Vec<String>,
    trees: Vec<Tree>,
}

/// A trained forest, immutable after loading.
#[derive(Debug, Clone)]
pub struct ClassifierModel {
    trees: Vec<Tree>,
}

impl ClassifierModel {
    /// Loads and validates a model artifact.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read or is empty
    /// - The JSON does not describe a forest over [`FEATURE_NAMES`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(ModelError::EmptyFile);
        }

        Self::from_json(&content)
    }

    /// Parses and validates an artifact already in memory.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Artifact = serde_json::from_str(json)?;

        if artifact.feature_names != FEATURE_NAMES {
            return Err(ModelError::Corrupt(format!(
                "feature names {:?} do not match {:?}",
                artifact.feature_names, FEATURE_NAMES
            )));
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::Corrupt("model has no trees".to_string()));
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            tree.validate(i)?;
        }

        Ok(Self {
            trees: artifact.trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean "strong" probability across all trees.
    pub fn probability_strong(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let row = features.to_row();
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.leaf_probability(&row)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

impl StrengthClassifier for ClassifierModel {
    fn predict(&self, password: &str) -> Result<bool, ClassifierError> {
        let features = FeatureVector::extract(password);
        Ok(self.probability_strong(&features)? > 0.5)
    }
}

/// Attempts to load the artifact at `path`, treating any failure as "no model".
pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<ClassifierModel> {
    let path = path.as_ref();
    match ClassifierModel::load(path) {
        Ok(model) => {
            #[cfg(feature = "tracing")]
            tracing::info!(
                "Classifier model loaded: {} trees from {:?}",
                model.tree_count(),
                path
            );
            Some(model)
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Classifier unavailable ({}), using rule-based scoring only", _e);
            None
        }
    }
}
