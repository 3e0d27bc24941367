//! Regression estimators evaluated on the transformed input vector.

use crate::pipeline::InferenceError;
use serde::{Deserialize, Serialize};

/// A node of a binary regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A regression tree stored as a flat node array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Check node references and feature indexes against an input width.
    pub fn check(&self, index: usize, width: usize) -> Result<(), InferenceError> {
        let malformed = |reason: String| InferenceError::MalformedTree {
            tree: index,
            reason,
        };
        if self.nodes.is_empty() {
            return Err(malformed("no nodes".to_string()));
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= width {
                    return Err(malformed(format!(
                        "node {id} splits on feature {feature}, input width is {width}"
                    )));
                }
                // Children strictly after their parent rules out cycles.
                for child in [*left, *right] {
                    if child <= id || child >= self.nodes.len() {
                        return Err(malformed(format!(
                            "node {id} references invalid child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, index: usize, x: &[f64]) -> Result<f64, InferenceError> {
        let mut id = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(id) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x.get(*feature).ok_or(InferenceError::ShapeMismatch {
                        expected: feature + 1,
                        actual: x.len(),
                    })?;
                    id = if v <= threshold { *left } else { *right };
                }
                None => {
                    return Err(InferenceError::MalformedTree {
                        tree: index,
                        reason: format!("missing node {id}"),
                    });
                }
            }
        }
        Err(InferenceError::MalformedTree {
            tree: index,
            reason: "no leaf reached".to_string(),
        })
    }
}

/// How tree outputs combine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of all trees (random forest).
    Mean,
    /// `base_score + learning_rate * sum(trees)` (gradient boosting).
    Boosted { base_score: f64, learning_rate: f64 },
}

/// Final regression stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        trees: Vec<RegressionTree>,
        aggregation: Aggregation,
    },
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Linear { .. } => "linear",
            Estimator::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    /// Check internal consistency against the transformer's output width.
    pub fn check(&self, width: usize) -> Result<(), InferenceError> {
        match self {
            Estimator::Linear { coefficients, .. } => {
                if coefficients.len() != width {
                    return Err(InferenceError::ShapeMismatch {
                        expected: coefficients.len(),
                        actual: width,
                    });
                }
                Ok(())
            }
            Estimator::TreeEnsemble { trees, .. } => {
                if trees.is_empty() {
                    return Err(InferenceError::EmptyEnsemble);
                }
                trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, tree)| tree.check(i, width))
            }
        }
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, InferenceError> {
        match self {
            Estimator::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != x.len() {
                    return Err(InferenceError::ShapeMismatch {
                        expected: coefficients.len(),
                        actual: x.len(),
                    });
                }
                Ok(intercept
                    + coefficients
                        .iter()
                        .zip(x)
                        .map(|(c, v)| c * v)
                        .sum::<f64>())
            }
            Estimator::TreeEnsemble { trees, aggregation } => {
                if trees.is_empty() {
                    return Err(InferenceError::EmptyEnsemble);
                }
                let mut total = 0.0;
                for (i, tree) in trees.iter().enumerate() {
                    total += tree.evaluate(i, x)?;
                }
                Ok(match aggregation {
                    Aggregation::Mean => total / trees.len() as f64,
                    Aggregation::Boosted {
                        base_score,
                        learning_rate,
                    } => base_score + learning_rate * total,
                })
            }
        }
    }
}
