//! Feature schemas: the ordered input contract of each disease model.
//!
//! A schema fixes the positional order of the feature vector a model was
//! trained on. Display placement (`FieldSpec::column`) is separate from that
//! order, so rearranging a form never reorders the vector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three diseases served by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    Diabetes,
    HeartDisease,
    Parkinsons,
}

impl Disease {
    pub const ALL: [Disease; 3] = [
        Disease::Diabetes,
        Disease::HeartDisease,
        Disease::Parkinsons,
    ];

    /// Identifier used in artifacts, config keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart_disease",
            Disease::Parkinsons => "parkinsons",
        }
    }

    /// URL path segment of the disease page.
    pub fn slug(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart-disease",
            Disease::Parkinsons => "parkinsons",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Disease::ALL.into_iter().find(|d| d.slug() == slug)
    }

    /// Heading of the disease page.
    pub fn title(&self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes Prediction",
            Disease::HeartDisease => "Heart Disease Prediction",
            Disease::Parkinsons => "Parkinson's Disease Prediction",
        }
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        match self {
            Disease::Diabetes => &DIABETES,
            Disease::HeartDisease => &HEART_DISEASE,
            Disease::Parkinsons => &PARKINSONS,
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disease {
    type Err = String;

    /// Accepts either the identifier (`heart_disease`) or the slug (`heart-disease`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Disease::ALL
            .into_iter()
            .find(|d| d.as_str() == lower || d.slug() == lower)
            .ok_or_else(|| {
                format!("Unknown disease: '{s}'. Use: diabetes, heart-disease, parkinsons")
            })
    }
}

/// One selectable option of a categorical field and its numeric code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub label: &'static str,
    pub code: u8,
}

/// Fixed mapping from option labels to model codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoding {
    pub options: &'static [Choice],
    pub default: &'static str,
}

impl Encoding {
    /// Numeric code of an option label, if the label is one of the options.
    pub fn encode(&self, label: &str) -> Option<u8> {
        self.options.iter().find(|c| c.label == label).map(|c| c.code)
    }
}

pub const SEX: Encoding = Encoding {
    options: &[
        Choice {
            label: "Male",
            code: 1,
        },
        Choice {
            label: "Female",
            code: 0,
        },
    ],
    default: "Male",
};

pub const YES_NO: Encoding = Encoding {
    options: &[
        Choice {
            label: "Yes",
            code: 1,
        },
        Choice {
            label: "No",
            code: 0,
        },
    ],
    default: "Yes",
};

/// Value domain of a schema field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer {
        min: i64,
        max: Option<i64>,
        default: i64,
    },
    Float {
        min: f64,
        max: Option<f64>,
        default: f64,
    },
    Categorical(Encoding),
}

/// A single named input of a feature schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Feature name as the model was trained with it. Also the form field name.
    pub key: &'static str,
    /// Label shown next to the input control.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Zero-based display column on the form.
    pub column: usize,
}

impl FieldSpec {
    const fn int(
        key: &'static str,
        label: &'static str,
        column: usize,
        min: i64,
        max: Option<i64>,
        default: i64,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Integer { min, max, default },
            column,
        }
    }

    const fn float(key: &'static str, label: &'static str, column: usize, default: f64) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Float {
                min: 0.0,
                max: None,
                default,
            },
            column,
        }
    }

    const fn choice(
        key: &'static str,
        label: &'static str,
        column: usize,
        encoding: Encoding,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Categorical(encoding),
            column,
        }
    }

    /// Voice-feature field: float, minimum 0, default 0, label equal to key.
    const fn voice(key: &'static str, column: usize) -> Self {
        Self::float(key, key, column, 0.0)
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Categorical(_))
    }
}

/// Ordered field list of one disease model.
#[derive(Debug, PartialEq)]
pub struct FeatureSchema {
    pub disease: Disease,
    /// Number of display columns on the form.
    pub columns: usize,
    pub fields: &'static [FieldSpec],
}

impl FeatureSchema {
    /// Number of features; also the required feature vector length.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Vector position of a field.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    /// Categorical fields with their encodings, in vector order.
    pub fn categorical_fields(
        &self,
    ) -> impl Iterator<Item = (&'static str, &'static Encoding)> + '_ {
        self.fields.iter().filter_map(|f| match &f.kind {
            FieldKind::Categorical(encoding) => Some((f.key, encoding)),
            _ => None,
        })
    }

    /// Fields grouped by display column, each column in vector order.
    pub fn layout(&self) -> Vec<Vec<&'static FieldSpec>> {
        let mut columns = vec![Vec::new(); self.columns];
        for field in self.fields {
            columns[field.column.min(self.columns - 1)].push(field);
        }
        columns
    }
}

pub static DIABETES: FeatureSchema = FeatureSchema {
    disease: Disease::Diabetes,
    columns: 3,
    fields: &[
        FieldSpec::int("Pregnancies", "Number of Pregnancies", 0, 0, None, 0),
        FieldSpec::float("Glucose", "Glucose Level (mg/dL)", 1, 0.0),
        FieldSpec::float("BloodPressure", "Blood Pressure (mm Hg)", 2, 0.0),
        FieldSpec::float("SkinThickness", "Skin Thickness (mm)", 0, 0.0),
        FieldSpec::float("Insulin", "Insulin Level (mu U/ml)", 1, 0.0),
        FieldSpec::float("BMI", "BMI", 2, 0.0),
        FieldSpec::float("DiabetesPedigreeFunction", "Diabetes Pedigree Function", 0, 0.0),
        FieldSpec::int("Age", "Age", 1, 0, None, 20),
    ],
};

pub static HEART_DISEASE: FeatureSchema = FeatureSchema {
    disease: Disease::HeartDisease,
    columns: 3,
    fields: &[
        FieldSpec::int("age", "Age", 0, 0, None, 30),
        FieldSpec::choice("sex", "Sex", 0, SEX),
        FieldSpec::int("cp", "Chest Pain Type (0-3)", 0, 0, Some(3), 0),
        FieldSpec::float("trestbps", "Resting Blood Pressure (mm Hg)", 0, 120.0),
        FieldSpec::float("chol", "Cholesterol (mg/dL)", 1, 200.0),
        FieldSpec::choice("fbs", "Fasting Blood Sugar > 120 mg/dL", 1, YES_NO),
        FieldSpec::int("restecg", "Resting ECG Results (0-2)", 1, 0, Some(2), 0),
        FieldSpec::float("thalach", "Maximum Heart Rate Achieved", 1, 150.0),
        FieldSpec::choice("exang", "Exercise-Induced Angina", 2, YES_NO),
        FieldSpec::float("oldpeak", "ST Depression Induced by Exercise", 2, 1.0),
        FieldSpec::int("slope", "Slope of the Peak Exercise ST Segment (0-2)", 2, 0, Some(2), 1),
        FieldSpec::int("ca", "Number of Major Vessels Colored (0-3)", 2, 0, Some(3), 0),
        FieldSpec::int(
            "thal",
            "Thalassemia (0=Normal, 1=Fixed Defect, 2=Reversible Defect)",
            2,
            0,
            Some(2),
            1,
        ),
    ],
};

pub static PARKINSONS: FeatureSchema = FeatureSchema {
    disease: Disease::Parkinsons,
    columns: 5,
    fields: &[
        FieldSpec::voice("MDVP:Fo(Hz)", 0),
        FieldSpec::voice("MDVP:Fhi(Hz)", 1),
        FieldSpec::voice("MDVP:Flo(Hz)", 2),
        FieldSpec::voice("MDVP:Jitter(%)", 3),
        FieldSpec::voice("MDVP:Jitter(Abs)", 4),
        FieldSpec::voice("MDVP:RAP", 0),
        FieldSpec::voice("MDVP:PPQ", 1),
        FieldSpec::voice("Jitter:DDP", 2),
        FieldSpec::voice("MDVP:Shimmer", 3),
        FieldSpec::voice("MDVP:Shimmer(dB)", 4),
        FieldSpec::voice("Shimmer:APQ3", 0),
        FieldSpec::voice("Shimmer:APQ5", 1),
        FieldSpec::voice("MDVP:APQ", 2),
        FieldSpec::voice("Shimmer:DDA", 3),
        FieldSpec::voice("NHR", 4),
        FieldSpec::voice("HNR", 0),
        FieldSpec::voice("RPDE", 1),
        FieldSpec::voice("DFA", 2),
        FieldSpec::voice("spread1", 3),
        FieldSpec::voice("spread2", 4),
        FieldSpec::voice("D2", 0),
        FieldSpec::voice("PPE", 1),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_schema_lengths() {
        assert_eq!(DIABETES.len(), 8);
        assert_eq!(HEART_DISEASE.len(), 13);
        assert_eq!(PARKINSONS.len(), 22);
    }

    #[test]
    fn test_diabetes_feature_order() {
        let keys: Vec<_> = DIABETES.keys().collect();
        assert_eq!(
            keys,
            vec![
                "Pregnancies",
                "Glucose",
                "BloodPressure",
                "SkinThickness",
                "Insulin",
                "BMI",
                "DiabetesPedigreeFunction",
                "Age",
            ]
        );
    }

    #[test]
    fn test_heart_disease_feature_order() {
        let keys: Vec<_> = HEART_DISEASE.keys().collect();
        assert_eq!(
            keys,
            vec![
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal",
            ]
        );
    }

    #[test]
    fn test_parkinsons_feature_order() {
        let keys: Vec<_> = PARKINSONS.keys().collect();
        assert_eq!(keys.first(), Some(&"MDVP:Fo(Hz)"));
        assert_eq!(keys.last(), Some(&"PPE"));
        assert_eq!(PARKINSONS.position("spread1"), Some(18));
        assert_eq!(PARKINSONS.position("HNR"), Some(15));
        assert_eq!(PARKINSONS.categorical_fields().count(), 0);
    }

    #[test]
    fn test_keys_are_unique() {
        for disease in Disease::ALL {
            let schema = disease.schema();
            let unique: HashSet<_> = schema.keys().collect();
            assert_eq!(unique.len(), schema.len(), "duplicate key in {disease}");
            assert_eq!(schema.disease, disease);
        }
    }

    #[test]
    fn test_fixed_encodings() {
        assert_eq!(SEX.encode("Male"), Some(1));
        assert_eq!(SEX.encode("Female"), Some(0));
        assert_eq!(YES_NO.encode("Yes"), Some(1));
        assert_eq!(YES_NO.encode("No"), Some(0));
        assert_eq!(SEX.encode("male"), None);
        assert_eq!(YES_NO.encode(""), None);
    }

    #[test]
    fn test_heart_categorical_positions() {
        let positions: Vec<_> = HEART_DISEASE
            .categorical_fields()
            .map(|(key, _)| HEART_DISEASE.position(key).unwrap())
            .collect();
        assert_eq!(positions, vec![1, 5, 8]);
    }

    #[test]
    fn test_defaults_within_bounds() {
        for disease in Disease::ALL {
            for field in disease.schema().fields {
                match field.kind {
                    FieldKind::Integer { min, max, default } => {
                        assert!(default >= min, "{}", field.key);
                        assert!(max.is_none_or(|m| default <= m), "{}", field.key);
                    }
                    FieldKind::Float { min, max, default } => {
                        assert!(default >= min, "{}", field.key);
                        assert!(max.is_none_or(|m| default <= m), "{}", field.key);
                    }
                    FieldKind::Categorical(encoding) => {
                        assert!(encoding.encode(encoding.default).is_some(), "{}", field.key);
                    }
                }
            }
        }
    }

    #[test]
    fn test_layout_keeps_every_field() {
        for disease in Disease::ALL {
            let schema = disease.schema();
            let layout = schema.layout();
            assert_eq!(layout.len(), schema.columns);
            let total: usize = layout.iter().map(Vec::len).sum();
            assert_eq!(total, schema.len());
        }
    }

    #[test]
    fn test_diabetes_layout_columns() {
        let layout = DIABETES.layout();
        let first: Vec<_> = layout[0].iter().map(|f| f.key).collect();
        assert_eq!(
            first,
            vec!["Pregnancies", "SkinThickness", "DiabetesPedigreeFunction"]
        );
        let third: Vec<_> = layout[2].iter().map(|f| f.key).collect();
        assert_eq!(third, vec!["BloodPressure", "BMI"]);
    }

    #[test]
    fn test_disease_slug_roundtrip() {
        for disease in Disease::ALL {
            assert_eq!(Disease::from_slug(disease.slug()), Some(disease));
        }
        assert_eq!(Disease::from_slug("heart_disease"), None);
        assert_eq!(Disease::from_slug("cancer"), None);
    }

    #[test]
    fn test_disease_from_str() {
        assert_eq!("heart-disease".parse::<Disease>(), Ok(Disease::HeartDisease));
        assert_eq!("heart_disease".parse::<Disease>(), Ok(Disease::HeartDisease));
        assert_eq!("Parkinsons".parse::<Disease>(), Ok(Disease::Parkinsons));
        assert!("flu".parse::<Disease>().is_err());
    }

    #[test]
    fn test_disease_serde_names() {
        let json = serde_json::to_string(&Disease::HeartDisease).unwrap();
        assert_eq!(json, "\"heart_disease\"");
        let restored: Disease = serde_json::from_str("\"parkinsons\"").unwrap();
        assert_eq!(restored, Disease::Parkinsons);
    }
}
