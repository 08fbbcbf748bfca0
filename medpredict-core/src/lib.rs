//! # MedPredict Core
//!
//! Core library for the MedPredict dashboard.
//! Provides the per-disease feature schemas, form decoding, feature vector
//! assembly, the model store, the prediction dispatcher, configuration and
//! the HTTP dashboard.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod gateway;
pub mod model;
pub mod navigation;
pub mod schema;
pub mod vector;

// Re-export commonly used types at the crate root.
pub use config::{DashboardConfig, ModelsConfig, UiConfig, load_config};
pub use dispatcher::{DiseasePage, Dispatcher, PageState, Verdict, VerdictStyle};
pub use error::{
    ArtifactError, ConfigError, DashboardError, FormError, PredictError, RenderError, Result,
};
pub use form::{FieldValue, FormState, RejectedSubmission};
pub use gateway::{AppState, PageRenderer, ServerConfig, SharedState};
pub use model::{Classifier, Label, ModelHandle, ModelStore};
pub use navigation::Page;
pub use schema::{Disease, FeatureSchema, FieldKind, FieldSpec};
pub use vector::FeatureVector;
