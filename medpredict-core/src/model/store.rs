//! Process-wide registry of loaded disease models.

use std::path::{Path, PathBuf};

use super::artifact::{ModelArtifact, Provenance};
use super::{Classifier, Label};
use crate::config::ModelsConfig;
use crate::error::{ArtifactError, PredictError};
use crate::schema::Disease;
use crate::vector::FeatureVector;

/// An immutable, loaded classifier for one disease.
#[derive(Debug)]
pub struct ModelHandle {
    disease: Disease,
    classifier: Box<dyn Classifier>,
    path: Option<PathBuf>,
    provenance: Option<Provenance>,
}

impl ModelHandle {
    /// Wrap an in-memory classifier.
    pub fn new(disease: Disease, classifier: Box<dyn Classifier>) -> Self {
        Self {
            disease,
            classifier,
            path: None,
            provenance: None,
        }
    }

    /// Read, validate and build the artifact at `path`.
    pub fn load(
        disease: Disease,
        path: &Path,
        require_encodings: bool,
    ) -> Result<Self, ArtifactError> {
        let artifact = ModelArtifact::read(disease, path)?;
        artifact.validate(disease, path, require_encodings)?;
        let classifier = artifact.build_classifier(path)?;

        tracing::info!(
            disease = %disease,
            path = %path.display(),
            algorithm = classifier.algorithm(),
            n_features = classifier.n_features(),
            source = artifact
                .provenance
                .as_ref()
                .and_then(|p| p.source.as_deref())
                .unwrap_or("unknown"),
            "Loaded model"
        );

        Ok(Self {
            disease,
            classifier,
            path: Some(path.to_path_buf()),
            provenance: artifact.provenance,
        })
    }

    pub fn disease(&self) -> Disease {
        self.disease
    }

    pub fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    pub fn algorithm(&self) -> &'static str {
        self.classifier.algorithm()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Classify a feature vector built for this handle's disease.
    pub fn predict(&self, vector: &FeatureVector) -> Result<Label, PredictError> {
        if vector.disease() != self.disease {
            return Err(PredictError::DiseaseMismatch {
                expected: self.disease,
                found: vector.disease(),
            });
        }
        if vector.len() != self.n_features() {
            return Err(PredictError::InvalidInputShape {
                disease: self.disease,
                expected: self.n_features(),
                found: vector.len(),
            });
        }
        Ok(self.classifier.predict(vector.values()))
    }
}

/// The three disease models, loaded once at startup and never mutated.
#[derive(Debug)]
pub struct ModelStore {
    diabetes: ModelHandle,
    heart_disease: ModelHandle,
    parkinsons: ModelHandle,
}

impl ModelStore {
    /// Load all artifacts from the configured models directory.
    pub fn load(config: &ModelsConfig) -> Result<Self, ArtifactError> {
        let dir = config.resolve_dir();
        tracing::info!(dir = %dir.display(), "Loading models");
        Self::load_from_dir(&dir, config)
    }

    /// Load all artifacts from `dir`, using the file names in `config`.
    pub fn load_from_dir(dir: &Path, config: &ModelsConfig) -> Result<Self, ArtifactError> {
        let load = |disease: Disease| {
            ModelHandle::load(
                disease,
                &dir.join(config.file_for(disease)),
                config.require_encodings,
            )
        };
        Ok(Self {
            diabetes: load(Disease::Diabetes)?,
            heart_disease: load(Disease::HeartDisease)?,
            parkinsons: load(Disease::Parkinsons)?,
        })
    }

    /// Assemble a store from already-built handles.
    ///
    /// Each handle must belong to its slot and match its schema's length.
    pub fn from_handles(
        diabetes: ModelHandle,
        heart_disease: ModelHandle,
        parkinsons: ModelHandle,
    ) -> Result<Self, ArtifactError> {
        for (expected, handle) in [
            (Disease::Diabetes, &diabetes),
            (Disease::HeartDisease, &heart_disease),
            (Disease::Parkinsons, &parkinsons),
        ] {
            if handle.disease() != expected {
                return Err(ArtifactError::DiseaseMismatch {
                    path: handle.path().map(Path::to_path_buf).unwrap_or_default(),
                    expected,
                    found: handle.disease(),
                });
            }
            if handle.n_features() != expected.schema().len() {
                return Err(ArtifactError::Dimension {
                    disease: expected,
                    expected: expected.schema().len(),
                    found: handle.n_features(),
                });
            }
        }
        Ok(Self {
            diabetes,
            heart_disease,
            parkinsons,
        })
    }

    pub fn get(&self, disease: Disease) -> &ModelHandle {
        match disease {
            Disease::Diabetes => &self.diabetes,
            Disease::HeartDisease => &self.heart_disease,
            Disease::Parkinsons => &self.parkinsons,
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = &ModelHandle> {
        Disease::ALL.into_iter().map(|d| self.get(d))
    }

    /// Route a vector to the model of its disease.
    pub fn predict(&self, vector: &FeatureVector) -> Result<Label, PredictError> {
        self.get(vector.disease()).predict(vector)
    }
}
