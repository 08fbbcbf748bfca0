//! # Model Store
//!
//! Loads one classifier per disease from JSON artifacts at startup and
//! exposes a uniform, pure `predict(vector) -> Label`. Handles are immutable
//! after load and shared read-only across requests.

mod artifact;
mod classifiers;
mod store;

pub use artifact::{
    ClassifierSpec, ModelArtifact, Provenance, ScalerSpec, TreeNode, TreeSpec,
    SUPPORTED_FORMAT_VERSION,
};
pub use classifiers::{ForestClassifier, LinearClassifier};
pub use store::{ModelHandle, ModelStore};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary output of a disease classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn as_u8(&self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(format!("label must be 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A loaded binary classifier.
///
/// Implementations are pure: the same input always yields the same label.
/// Callers guarantee `features.len() == self.n_features()`.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Input dimensionality the classifier was trained on.
    fn n_features(&self) -> usize;

    /// Short algorithm name for logs and the `check` summary.
    fn algorithm(&self) -> &'static str;

    fn predict(&self, features: &[f64]) -> Label;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_conversions() {
        assert_eq!(Label::try_from(0u8), Ok(Label::Negative));
        assert_eq!(Label::try_from(1u8), Ok(Label::Positive));
        assert!(Label::try_from(2u8).is_err());
        assert_eq!(u8::from(Label::Positive), 1);
        assert_eq!(Label::Negative.to_string(), "0");
    }

    #[test]
    fn test_label_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Label::Positive).unwrap(), "1");
        let label: Label = serde_json::from_str("0").unwrap();
        assert_eq!(label, Label::Negative);
        assert!(serde_json::from_str::<Label>("3").is_err());
    }
}
