//! Form state: the values entered on one disease page.
//!
//! A `FormState` always holds one value per schema field, aligned with the
//! schema order, and every value satisfies its field's bounds. Values enter
//! only through [`FormState::set`] or [`FormState::from_submission`].

use crate::error::FormError;
use crate::schema::{Choice, Disease, FieldKind, FieldSpec};

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single entered value, before categorical encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Choice(Choice),
}

impl FieldValue {
    /// The schema default for a field.
    pub fn default_for(field: &FieldSpec) -> Self {
        match field.kind {
            FieldKind::Integer { default, .. } => FieldValue::Integer(default),
            FieldKind::Float { default, .. } => FieldValue::Float(default),
            FieldKind::Categorical(encoding) => {
                let choice = encoding
                    .options
                    .iter()
                    .find(|c| c.label == encoding.default)
                    .or(encoding.options.first())
                    .copied()
                    .unwrap_or(Choice {
                        label: encoding.default,
                        code: 0,
                    });
                FieldValue::Choice(choice)
            }
        }
    }

    /// Parse raw input for `field`, enforcing its bounds and options.
    pub fn parse(field: &FieldSpec, raw: &str) -> Result<Self, FormError> {
        let raw = raw.trim();
        let unparseable = || FormError::Unparseable {
            field: field.key.to_string(),
            value: raw.to_string(),
        };
        match field.kind {
            FieldKind::Integer { min, max, .. } => {
                // Number inputs submit "30.0" or "1e1" for whole numbers too.
                let value: f64 = raw.parse().map_err(|_| unparseable())?;
                if !value.is_finite() || value.fract() != 0.0 {
                    return Err(unparseable());
                }
                check_bounds(field, value, min as f64, max.map(|m| m as f64))?;
                if value.abs() > MAX_EXACT_INTEGER {
                    return Err(unparseable());
                }
                Ok(FieldValue::Integer(value as i64))
            }
            FieldKind::Float { min, max, .. } => {
                let value: f64 = raw.parse().map_err(|_| unparseable())?;
                if !value.is_finite() {
                    return Err(unparseable());
                }
                check_bounds(field, value, min, max)?;
                Ok(FieldValue::Float(value))
            }
            FieldKind::Categorical(encoding) => encoding
                .options
                .iter()
                .find(|c| c.label == raw)
                .map(|c| FieldValue::Choice(*c))
                .ok_or_else(|| FormError::UnknownOption {
                    field: field.key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Numeric feature value; categorical options map to their fixed code.
    pub fn to_feature(&self) -> f64 {
        match self {
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Float(v) => *v,
            FieldValue::Choice(choice) => f64::from(choice.code),
        }
    }

    /// Text used to re-populate the input control.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Choice(choice) => choice.label.to_string(),
        }
    }
}

fn check_bounds(
    field: &FieldSpec,
    value: f64,
    min: f64,
    max: Option<f64>,
) -> Result<(), FormError> {
    if value < min {
        return Err(FormError::BelowMinimum {
            field: field.key.to_string(),
            min,
            value,
        });
    }
    if let Some(max) = max
        && value > max
    {
        return Err(FormError::AboveMaximum {
            field: field.key.to_string(),
            max,
            value,
        });
    }
    Ok(())
}

/// Values of one disease form, aligned with the disease's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    disease: Disease,
    values: Vec<FieldValue>,
}

impl FormState {
    /// A form pre-populated with the schema defaults.
    pub fn new(disease: Disease) -> Self {
        let values = disease
            .schema()
            .fields
            .iter()
            .map(FieldValue::default_for)
            .collect();
        Self { disease, values }
    }

    /// Decode a submission. Fields absent from the submission keep their
    /// default; names outside the schema (e.g. the submit button) are ignored.
    pub fn from_submission<'a, I>(disease: Disease, fields: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::decode(disease, fields).map_err(|rejection| rejection.error)
    }

    /// Like [`FormState::from_submission`], but a rejection keeps every
    /// field that did decode, plus the raw text of the first failing one.
    pub fn decode<'a, I>(disease: Disease, fields: I) -> Result<Self, RejectedSubmission>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::new(disease);
        let mut first_error: Option<(FormError, String)> = None;
        for (key, raw) in fields {
            if disease.schema().field(key).is_none() {
                tracing::debug!(disease = %disease, field = key, "Ignoring unknown form field");
                continue;
            }
            if let Err(e) = form.set(key, raw)
                && first_error.is_none()
            {
                first_error = Some((e, raw.to_string()));
            }
        }
        match first_error {
            None => Ok(form),
            Some((error, raw)) => Err(RejectedSubmission { form, error, raw }),
        }
    }

    pub fn disease(&self) -> Disease {
        self.disease
    }

    /// Set a field from raw input text.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let schema = self.disease.schema();
        let position = schema.position(key).ok_or_else(|| FormError::UnknownField {
            field: key.to_string(),
        })?;
        self.values[position] = FieldValue::parse(&schema.fields[position], raw)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.disease
            .schema()
            .position(key)
            .map(|position| &self.values[position])
    }

    /// Field specs paired with their current values, in schema order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> + '_ {
        self.disease.schema().fields.iter().zip(self.values.iter())
    }
}

/// A submission that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSubmission {
    /// Every field that decoded; the failing field keeps its previous value.
    pub form: FormState,
    pub error: FormError,
    /// Raw text submitted for the failing field.
    pub raw: String,
}
