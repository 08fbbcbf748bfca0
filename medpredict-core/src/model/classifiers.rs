//! Classifier implementations evaluated from artifact parameters.

use super::artifact::{ScalerSpec, TreeNode};
use super::{Classifier, Label};

/// Linear decision function with optional standard scaling.
///
/// Predicts `Positive` iff `intercept + sum(w_i * (x_i - mean_i) / scale_i) > 0`.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    scaler: Option<ScalerSpec>,
}

impl LinearClassifier {
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        scaler: Option<ScalerSpec>,
    ) -> Result<Self, String> {
        if coefficients.is_empty() {
            return Err("linear classifier has no coefficients".into());
        }
        if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
            return Err("linear classifier parameters must be finite".into());
        }
        if let Some(scaler) = &scaler {
            if scaler.mean.len() != coefficients.len() || scaler.scale.len() != coefficients.len()
            {
                return Err(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    coefficients.len()
                ));
            }
            if scaler.mean.iter().any(|m| !m.is_finite()) {
                return Err("scaler means must be finite".into());
            }
            if scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scaler scales must be finite and non-zero".into());
            }
        }
        Ok(Self {
            coefficients,
            intercept,
            scaler,
        })
    }

    /// Signed distance from the decision boundary.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let dot: f64 = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
                .sum(),
            None => features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum(),
        };
        self.intercept + dot
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn algorithm(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &[f64]) -> Label {
        if self.decision_function(features) > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// Majority vote over flat decision trees.
///
/// Ties resolve to `Negative`.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    n_features: usize,
    trees: Vec<Vec<TreeNode>>,
}

impl ForestClassifier {
    /// Validates that every tree is non-empty, splits reference known
    /// features and children point strictly forward, so traversal always
    /// terminates at a leaf.
    pub fn new(n_features: usize, trees: Vec<Vec<TreeNode>>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (t, nodes) in trees.iter().enumerate() {
            if nodes.is_empty() {
                return Err(format!("tree {t} has no nodes"));
            }
            for (i, node) in nodes.iter().enumerate() {
                let TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } = node
                else {
                    continue;
                };
                if *feature >= n_features {
                    return Err(format!(
                        "tree {t} node {i} splits on feature {feature} of {n_features}"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("tree {t} node {i} has a non-finite threshold"));
                }
                for child in [*left, *right] {
                    if child <= i || child >= nodes.len() {
                        return Err(format!(
                            "tree {t} node {i} has invalid child index {child}"
                        ));
                    }
                }
            }
        }
        Ok(Self { n_features, trees })
    }

    fn vote(nodes: &[TreeNode], features: &[f64]) -> Label {
        let mut index = 0;
        loop {
            match &nodes[index] {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl Classifier for ForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn algorithm(&self) -> &'static str {
        "forest"
    }

    fn predict(&self, features: &[f64]) -> Label {
        let positive = self
            .trees
            .iter()
            .filter(|nodes| Self::vote(nodes, features) == Label::Positive)
            .count();
        if positive * 2 > self.trees.len() {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}
