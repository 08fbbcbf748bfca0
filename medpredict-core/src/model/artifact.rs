//! On-disk model artifact format.
//!
//! Artifacts are JSON documents exported by the training tooling. Besides the
//! classifier parameters they may declare the feature order and categorical
//! encodings the model was trained with; both are checked against the
//! dashboard's schema at load time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::classifiers::{ForestClassifier, LinearClassifier};
use super::{Classifier, Label};
use crate::error::ArtifactError;
use crate::schema::Disease;

/// The only artifact layout this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// A serialized disease classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub disease: Disease,
    /// Feature names in training order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Field key -> option label -> code, for categorical inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodings: Option<BTreeMap<String, BTreeMap<String, u8>>>,
    pub classifier: ClassifierSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// Classifier parameters, tagged by algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Linear decision function (logistic regression, linear SVM).
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scaler: Option<ScalerSpec>,
    },
    /// Majority vote over decision trees.
    Forest {
        n_features: usize,
        trees: Vec<TreeSpec>,
    },
}

/// Standard scaling applied before the linear decision function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerSpec {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// A decision tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: Label,
    },
}

/// Where an artifact came from. Informational only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ModelArtifact {
    /// Read and parse an artifact file.
    pub fn read(disease: Disease, path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::Missing {
                disease,
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse artifact JSON. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ArtifactError> {
        serde_json::from_str(content).map_err(|e| ArtifactError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the artifact against the schema of `expected`.
    ///
    /// With `require_encodings`, every categorical field of the schema must
    /// have a declared encoding; otherwise a missing declaration is only
    /// logged.
    pub fn validate(
        &self,
        expected: Disease,
        path: &Path,
        require_encodings: bool,
    ) -> Result<(), ArtifactError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ArtifactError::Malformed {
                path: path.to_path_buf(),
                message: format!(
                    "unsupported format_version {} (supported: {})",
                    self.format_version, SUPPORTED_FORMAT_VERSION
                ),
            });
        }
        if self.disease != expected {
            return Err(ArtifactError::DiseaseMismatch {
                path: path.to_path_buf(),
                expected,
                found: self.disease,
            });
        }
        self.validate_feature_names(expected)?;
        self.validate_encodings(expected, require_encodings)
    }

    fn validate_feature_names(&self, disease: Disease) -> Result<(), ArtifactError> {
        let schema = disease.schema();
        let Some(names) = &self.feature_names else {
            tracing::warn!(
                disease = %disease,
                "Model artifact does not declare feature names; feature order is unverified"
            );
            return Ok(());
        };
        if names.len() != schema.len() {
            return Err(ArtifactError::Dimension {
                disease,
                expected: schema.len(),
                found: names.len(),
            });
        }
        for (position, (expected, found)) in schema.keys().zip(names).enumerate() {
            if expected != found {
                return Err(ArtifactError::FeatureOrder {
                    disease,
                    position,
                    expected: expected.to_string(),
                    found: found.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_encodings(
        &self,
        disease: Disease,
        require_encodings: bool,
    ) -> Result<(), ArtifactError> {
        let schema = disease.schema();
        let declared = self.encodings.as_ref();

        if let Some(declared) = declared {
            for field in declared.keys() {
                let is_categorical = schema.field(field).is_some_and(|f| f.is_categorical());
                if !is_categorical {
                    return Err(ArtifactError::Encoding {
                        disease,
                        field: field.clone(),
                        message: "declared for a field that is not categorical".into(),
                    });
                }
            }
        }

        for (key, encoding) in schema.categorical_fields() {
            let Some(mapping) = declared.and_then(|d| d.get(key)) else {
                if require_encodings {
                    return Err(ArtifactError::Encoding {
                        disease,
                        field: key.to_string(),
                        message: "no encoding declared".into(),
                    });
                }
                tracing::warn!(
                    disease = %disease,
                    field = key,
                    "Model artifact does not declare an encoding; assuming the fixed mapping"
                );
                continue;
            };

            if mapping.len() != encoding.options.len() {
                return Err(ArtifactError::Encoding {
                    disease,
                    field: key.to_string(),
                    message: format!(
                        "declares {} options, expected {}",
                        mapping.len(),
                        encoding.options.len()
                    ),
                });
            }
            for choice in encoding.options {
                match mapping.get(choice.label) {
                    Some(code) if *code == choice.code => {}
                    Some(code) => {
                        return Err(ArtifactError::Encoding {
                            disease,
                            field: key.to_string(),
                            message: format!(
                                "'{}' is encoded as {}, expected {}",
                                choice.label, code, choice.code
                            ),
                        });
                    }
                    None => {
                        return Err(ArtifactError::Encoding {
                            disease,
                            field: key.to_string(),
                            message: format!("option '{}' is not declared", choice.label),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the classifier, checking its dimensionality against the schema.
    pub fn build_classifier(&self, path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
        let malformed = |message: String| ArtifactError::Malformed {
            path: path.to_path_buf(),
            message,
        };
        let classifier: Box<dyn Classifier> = match &self.classifier {
            ClassifierSpec::Linear {
                coefficients,
                intercept,
                scaler,
            } => Box::new(
                LinearClassifier::new(coefficients.clone(), *intercept, scaler.clone())
                    .map_err(malformed)?,
            ),
            ClassifierSpec::Forest { n_features, trees } => Box::new(
                ForestClassifier::new(
                    *n_features,
                    trees.iter().map(|t| t.nodes.clone()).collect(),
                )
                .map_err(malformed)?,
            ),
        };

        let expected = self.disease.schema().len();
        if classifier.n_features() != expected {
            return Err(ArtifactError::Dimension {
                disease: self.disease,
                expected,
                found: classifier.n_features(),
            });
        }
        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HEART_DISEASE;
    use serde_json::json;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("test_model.json")
    }

    fn heart_artifact(encodings: serde_json::Value) -> ModelArtifact {
        let names: Vec<&str> = HEART_DISEASE.keys().collect();
        let value = json!({
            "format_version": 1,
            "disease": "heart_disease",
            "feature_names": names,
            "encodings": encodings,
            "classifier": {
                "kind": "linear",
                "coefficients": vec![0.0; 13],
                "intercept": 0.5,
            }
        });
        serde_json::from_value(value).unwrap()
    }

    fn fixed_heart_encodings() -> serde_json::Value {
        json!({
            "sex": {"Male": 1, "Female": 0},
            "fbs": {"Yes": 1, "No": 0},
            "exang": {"Yes": 1, "No": 0},
        })
    }

    #[test]
    fn test_parse_linear_artifact() {
        let content = r#"{
            "format_version": 1,
            "disease": "diabetes",
            "classifier": {
                "kind": "linear",
                "coefficients": [1, 2, 3, 4, 5, 6, 7, 8],
                "intercept": -1.5,
                "scaler": {"mean": [0, 0, 0, 0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1, 1, 1, 1]}
            },
            "provenance": {"source": "unit test"}
        }"#;
        let artifact = ModelArtifact::parse(content, &path()).unwrap();
        assert_eq!(artifact.disease, Disease::Diabetes);
        assert!(artifact.feature_names.is_none());
        match &artifact.classifier {
            ClassifierSpec::Linear {
                coefficients,
                intercept,
                scaler,
            } => {
                assert_eq!(coefficients.len(), 8);
                assert_eq!(*intercept, -1.5);
                assert!(scaler.is_some());
            }
            other => panic!("Expected linear classifier, got {other:?}"),
        }
        assert_eq!(
            artifact.provenance.unwrap().source.as_deref(),
            Some("unit test")
        );
    }

    #[test]
    fn test_parse_forest_artifact() {
        let content = r#"{
            "format_version": 1,
            "disease": "parkinsons",
            "classifier": {
                "kind": "forest",
                "n_features": 22,
                "trees": [{"nodes": [
                    {"split": {"feature": 21, "threshold": 0.2, "left": 1, "right": 2}},
                    {"leaf": {"label": 0}},
                    {"leaf": {"label": 1}}
                ]}]
            }
        }"#;
        let artifact = ModelArtifact::parse(content, &path()).unwrap();
        match &artifact.classifier {
            ClassifierSpec::Forest { n_features, trees } => {
                assert_eq!(*n_features, 22);
                assert_eq!(trees[0].nodes.len(), 3);
                assert_eq!(
                    trees[0].nodes[2],
                    TreeNode::Leaf {
                        label: Label::Positive
                    }
                );
            }
            other => panic!("Expected forest classifier, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed() {
        let err = ModelArtifact::parse("{not json", &path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));

        let err = ModelArtifact::parse(
            r#"{"format_version": 1, "disease": "flu", "classifier": {"kind": "linear", "coefficients": [], "intercept": 0}}"#,
            &path(),
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ModelArtifact::read(Disease::Parkinsons, &missing).unwrap_err();
        match err {
            ArtifactError::Missing { disease, path } => {
                assert_eq!(disease, Disease::Parkinsons);
                assert_eq!(path, missing);
            }
            other => panic!("Expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_fixed_encodings() {
        let artifact = heart_artifact(fixed_heart_encodings());
        artifact
            .validate(Disease::HeartDisease, &path(), true)
            .unwrap();
    }

    #[test]
    fn test_validate_rejects_swapped_encoding() {
        let artifact = heart_artifact(json!({
            "sex": {"Male": 0, "Female": 1},
            "fbs": {"Yes": 1, "No": 0},
            "exang": {"Yes": 1, "No": 0},
        }));
        let err = artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap_err();
        match err {
            ArtifactError::Encoding { field, message, .. } => {
                assert_eq!(field, "sex");
                assert!(message.contains("'Male' is encoded as 0"));
            }
            other => panic!("Expected Encoding, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_missing_encoding_strictness() {
        let artifact = heart_artifact(json!({
            "sex": {"Male": 1, "Female": 0},
            "fbs": {"Yes": 1, "No": 0},
        }));
        artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap();
        let err = artifact
            .validate(Disease::HeartDisease, &path(), true)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Encoding { ref field, .. } if field == "exang"));
    }

    #[test]
    fn test_validate_rejects_encoding_for_numeric_field() {
        let mut encodings = fixed_heart_encodings();
        encodings["cp"] = json!({"Typical": 0});
        let artifact = heart_artifact(encodings);
        let err = artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Encoding { ref field, .. } if field == "cp"));
    }

    #[test]
    fn test_validate_rejects_extra_option() {
        let mut encodings = fixed_heart_encodings();
        encodings["sex"] = json!({"Male": 1, "Female": 0, "Other": 2});
        let artifact = heart_artifact(encodings);
        let err = artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Encoding { .. }));
    }

    #[test]
    fn test_validate_rejects_wrong_disease() {
        let artifact = heart_artifact(fixed_heart_encodings());
        let err = artifact
            .validate(Disease::Diabetes, &path(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::DiseaseMismatch {
                expected: Disease::Diabetes,
                found: Disease::HeartDisease,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_reordered_features() {
        let mut artifact = heart_artifact(fixed_heart_encodings());
        if let Some(names) = artifact.feature_names.as_mut() {
            names.swap(3, 4);
        }
        let err = artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap_err();
        match err {
            ArtifactError::FeatureOrder {
                position,
                expected,
                found,
                ..
            } => {
                assert_eq!(position, 3);
                assert_eq!(expected, "trestbps");
                assert_eq!(found, "chol");
            }
            other => panic!("Expected FeatureOrder, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_unsupported_version() {
        let mut artifact = heart_artifact(fixed_heart_encodings());
        artifact.format_version = 2;
        let err = artifact
            .validate(Disease::HeartDisease, &path(), false)
            .unwrap_err();
        assert!(err.to_string().contains("unsupported format_version 2"));
    }

    #[test]
    fn test_build_classifier_checks_dimension() {
        let mut artifact = heart_artifact(fixed_heart_encodings());
        artifact.classifier = ClassifierSpec::Linear {
            coefficients: vec![0.1; 12],
            intercept: 0.0,
            scaler: None,
        };
        let err = artifact.build_classifier(&path()).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Dimension {
                expected: 13,
                found: 12,
                ..
            }
        ));
    }

    #[test]
    fn test_build_classifier_rejects_bad_parameters() {
        let mut artifact = heart_artifact(fixed_heart_encodings());
        artifact.classifier = ClassifierSpec::Linear {
            coefficients: vec![0.1; 13],
            intercept: f64::NAN,
            scaler: None,
        };
        let err = artifact.build_classifier(&path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }
}
