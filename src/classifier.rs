use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, PredictError};

pub const FOREST_ARTIFACT_VERSION: u32 = 1;

/// A pre-trained multi-class model. Inputs are ordered as `feature_names`.
pub trait Classifier {
    fn classes(&self) -> &[String];

    fn feature_names(&self) -> &[String];

    /// One probability per entry of `classes`, same order.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictError>;

    fn predict(&self, features: &[f64]) -> Result<String, PredictError> {
        let proba = self.predict_proba(features)?;
        let mut best = 0usize;
        for (idx, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = idx;
            }
        }
        self.classes()
            .get(best)
            .cloned()
            .ok_or_else(|| PredictError::UnknownLabel(format!("#{best}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub version: u32,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights, e.g. training sample counts at the leaf.
    Leaf { value: Vec<f64> },
}

/// Random-forest classifier: mean of per-tree leaf distributions.
#[derive(Debug, Clone)]
pub struct RandomForest {
    artifact: ForestArtifact,
}

impl RandomForest {
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, LoadError> {
        validate_artifact(&artifact)?;
        Ok(Self { artifact })
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let artifact = serde_json::from_str::<ForestArtifact>(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn tree_count(&self) -> usize {
        self.artifact.trees.len()
    }

    pub fn source(&self) -> Option<&str> {
        self.artifact.source.as_deref()
    }

    fn leaf_for<'a>(tree: &'a TreeArtifact, features: &[f64]) -> &'a [f64] {
        let mut idx = 0usize;
        loop {
            match &tree.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl Classifier for RandomForest {
    fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictError> {
        let expected = self.artifact.feature_names.len();
        if features.len() != expected {
            return Err(PredictError::FeatureCount {
                expected,
                got: features.len(),
            });
        }

        let n_classes = self.artifact.classes.len();
        let mut out = vec![0.0; n_classes];
        for tree in &self.artifact.trees {
            let leaf = Self::leaf_for(tree, features);
            let total: f64 = leaf.iter().sum();
            for (acc, w) in out.iter_mut().zip(leaf) {
                *acc += w / total;
            }
        }

        let n_trees = self.artifact.trees.len() as f64;
        for p in &mut out {
            *p /= n_trees;
        }
        Ok(out)
    }
}

pub fn load_classifier(path: &Path) -> Result<RandomForest, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RandomForest::from_json(&raw)
}

fn validate_artifact(artifact: &ForestArtifact) -> Result<(), LoadError> {
    let invalid = |msg: String| Err(LoadError::InvalidArtifact(msg));

    if artifact.version != FOREST_ARTIFACT_VERSION {
        return invalid(format!(
            "unsupported version {} (expected {FOREST_ARTIFACT_VERSION})",
            artifact.version
        ));
    }
    if artifact.classes.is_empty() {
        return invalid("no classes".to_string());
    }
    let mut seen = HashSet::new();
    for class in &artifact.classes {
        if !seen.insert(class.as_str()) {
            return invalid(format!("duplicate class `{class}`"));
        }
    }
    let mut seen = HashSet::new();
    for name in &artifact.feature_names {
        if !seen.insert(name.as_str()) {
            return invalid(format!("duplicate feature `{name}`"));
        }
    }
    if artifact.trees.is_empty() {
        return invalid("no trees".to_string());
    }

    let n_features = artifact.feature_names.len();
    let n_classes = artifact.classes.len();
    for (t, tree) in artifact.trees.iter().enumerate() {
        if tree.nodes.is_empty() {
            return invalid(format!("tree {t} has no nodes"));
        }
        for (i, node) in tree.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return invalid(format!(
                            "tree {t} node {i}: feature {feature} out of range"
                        ));
                    }
                    if !threshold.is_finite() {
                        return invalid(format!("tree {t} node {i}: threshold is not finite"));
                    }
                    // Children strictly after the parent keeps traversal acyclic.
                    for child in [*left, *right] {
                        if child <= i || child >= tree.nodes.len() {
                            return invalid(format!("tree {t} node {i}: bad child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return invalid(format!(
                            "tree {t} node {i}: leaf has {} weights for {n_classes} classes",
                            value.len()
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return invalid(format!("tree {t} node {i}: negative or non-finite weight"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return invalid(format!("tree {t} node {i}: empty leaf"));
                    }
                }
            }
        }
    }
    Ok(())
}
