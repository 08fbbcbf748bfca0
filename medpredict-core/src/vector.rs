//! Feature vector assembly.

use crate::form::FormState;
use crate::schema::Disease;

/// Ordered model input derived from a `FormState`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    disease: Disease,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Project a form onto its schema order, encoding categorical options.
    pub fn assemble(form: &FormState) -> Self {
        let values = form.entries().map(|(_, value)| value.to_feature()).collect();
        Self {
            disease: form.disease(),
            values,
        }
    }

    /// Wrap raw values. The length is checked by the model at predict time.
    pub fn from_values(disease: Disease, values: Vec<f64>) -> Self {
        Self { disease, values }
    }

    pub fn disease(&self) -> Disease {
        self.disease
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
