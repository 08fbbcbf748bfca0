//! Error types for the MedPredict core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering model artifacts, prediction, form decoding, configuration and
//! page rendering.

use std::path::PathBuf;

use crate::schema::Disease;

/// Top-level error type for the MedPredict core library.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Model artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Prediction error: {0}")]
    Predict(#[from] PredictError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading model artifacts at startup.
///
/// Every variant is fatal: the dashboard does not serve predictions with a
/// partially loaded model store.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact for {disease} not found: {path}")]
    Missing { disease: Disease, path: PathBuf },

    #[error("Model artifact {path} could not be read: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Model artifact {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Model artifact {path} is for {found}, expected {expected}")]
    DiseaseMismatch {
        path: PathBuf,
        expected: Disease,
        found: Disease,
    },

    #[error("Model for {disease} expects {found} features, schema has {expected}")]
    Dimension {
        disease: Disease,
        expected: usize,
        found: usize,
    },

    #[error("Model for {disease} was trained with '{found}' at position {position}, schema has '{expected}'")]
    FeatureOrder {
        disease: Disease,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Model for {disease} encodes field '{field}' differently: {message}")]
    Encoding {
        disease: Disease,
        field: String,
        message: String,
    },
}

/// Errors from the predict operation.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Invalid input shape for {disease}: expected {expected} features, got {found}")]
    InvalidInputShape {
        disease: Disease,
        expected: usize,
        found: usize,
    },

    #[error("Feature vector for {found} routed to the {expected} model")]
    DiseaseMismatch { expected: Disease, found: Disease },
}

/// Errors from decoding a submitted form into a `FormState`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    #[error("Field '{field}' has an invalid value '{value}'")]
    Unparseable { field: String, value: String },

    #[error("Field '{field}' must be at least {min}, got {value}")]
    BelowMinimum { field: String, min: f64, value: f64 },

    #[error("Field '{field}' must be at most {max}, got {value}")]
    AboveMaximum { field: String, max: f64, value: f64 },

    #[error("Field '{field}' has no option '{value}'")]
    UnknownOption { field: String, value: String },
}

impl FormError {
    /// Name of the offending field, without its value.
    pub fn field(&self) -> &str {
        match self {
            FormError::UnknownField { field }
            | FormError::Unparseable { field, .. }
            | FormError::BelowMinimum { field, .. }
            | FormError::AboveMaximum { field, .. }
            | FormError::UnknownOption { field, .. } => field,
        }
    }
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from compiling or rendering page templates.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template '{name}' failed to compile: {message}")]
    Template { name: String, message: String },

    #[error("Page '{name}' failed to render: {message}")]
    Page { name: String, message: String },
}

/// A type alias for results using the top-level `DashboardError`.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_artifact() {
        let err = DashboardError::Artifact(ArtifactError::Missing {
            disease: Disease::Diabetes,
            path: PathBuf::from("models/diabetes_model.json"),
        });
        assert_eq!(
            err.to_string(),
            "Model artifact error: Model artifact for diabetes not found: models/diabetes_model.json"
        );
    }

    #[test]
    fn test_error_display_invalid_input_shape() {
        let err = DashboardError::Predict(PredictError::InvalidInputShape {
            disease: Disease::HeartDisease,
            expected: 13,
            found: 12,
        });
        assert_eq!(
            err.to_string(),
            "Prediction error: Invalid input shape for heart_disease: expected 13 features, got 12"
        );
    }

    #[test]
    fn test_error_display_form() {
        let err = FormError::BelowMinimum {
            field: "Glucose".into(),
            min: 0.0,
            value: -1.5,
        };
        assert_eq!(err.to_string(), "Field 'Glucose' must be at least 0, got -1.5");

        let err = FormError::UnknownOption {
            field: "sex".into(),
            value: "Other".into(),
        };
        assert_eq!(err.to_string(), "Field 'sex' has no option 'Other'");
        assert_eq!(err.field(), "sex");
    }

    #[test]
    fn test_error_display_feature_order() {
        let err = ArtifactError::FeatureOrder {
            disease: Disease::Diabetes,
            position: 1,
            expected: "Glucose".into(),
            found: "BloodPressure".into(),
        };
        assert_eq!(
            err.to_string(),
            "Model for diabetes was trained with 'BloodPressure' at position 1, schema has 'Glucose'"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DashboardError = io_err.into();
        assert!(matches!(err, DashboardError::Io(_)));
    }

    #[test]
    fn test_error_from_form() {
        let err: DashboardError = FormError::UnknownField {
            field: "color".into(),
        }
        .into();
        assert!(matches!(err, DashboardError::Form(_)));
        assert_eq!(err.to_string(), "Form error: Unknown field 'color'");
    }
}
