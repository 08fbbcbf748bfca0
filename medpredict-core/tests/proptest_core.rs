//! Property-based tests for form decoding, vector assembly and prediction.

use proptest::prelude::*;

use medpredict_core::model::LinearClassifier;
use medpredict_core::{Disease, FeatureVector, FormState, ModelHandle, ModelStore};

fn disease() -> impl Strategy<Value = Disease> {
    prop_oneof![
        Just(Disease::Diabetes),
        Just(Disease::HeartDisease),
        Just(Disease::Parkinsons),
    ]
}

fn linear(disease: Disease, weights: &[f64], intercept: f64) -> ModelHandle {
    let n = disease.schema().len();
    let coefficients = weights.iter().copied().cycle().take(n).collect();
    ModelHandle::new(
        disease,
        Box::new(LinearClassifier::new(coefficients, intercept, None).unwrap()),
    )
}

// --- Vector assembly properties ---

proptest! {
    #[test]
    fn vector_length_matches_schema(disease in disease()) {
        let vector = FeatureVector::assemble(&FormState::new(disease));
        prop_assert_eq!(vector.len(), disease.schema().len());
    }

    #[test]
    fn diabetes_vector_preserves_entered_values(
        pregnancies in 0i64..20,
        glucose in 0.0f64..300.0,
        bmi in 0.0f64..70.0,
        age in 0i64..120,
    ) {
        let glucose = glucose.to_string();
        let bmi = bmi.to_string();
        let pregnancies = pregnancies.to_string();
        let age = age.to_string();
        let form = FormState::from_submission(
            Disease::Diabetes,
            [
                ("Pregnancies", pregnancies.as_str()),
                ("Glucose", glucose.as_str()),
                ("BMI", bmi.as_str()),
                ("Age", age.as_str()),
            ],
        )
        .unwrap();
        let vector = FeatureVector::assemble(&form);
        prop_assert_eq!(vector.len(), 8);
        prop_assert_eq!(vector.values()[0], pregnancies.parse::<f64>().unwrap());
        prop_assert_eq!(vector.values()[1], glucose.parse::<f64>().unwrap());
        prop_assert_eq!(vector.values()[5], bmi.parse::<f64>().unwrap());
        prop_assert_eq!(vector.values()[7], age.parse::<f64>().unwrap());
    }

    #[test]
    fn heart_encoding_is_fixed_regardless_of_other_fields(
        age in 0i64..100,
        chol in 100.0f64..400.0,
        ca in 0i64..=3,
        female in any::<bool>(),
        fbs in any::<bool>(),
        exang in any::<bool>(),
    ) {
        let age = age.to_string();
        let chol = chol.to_string();
        let ca = ca.to_string();
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        let form = FormState::from_submission(
            Disease::HeartDisease,
            [
                ("age", age.as_str()),
                ("sex", if female { "Female" } else { "Male" }),
                ("chol", chol.as_str()),
                ("fbs", yes_no(fbs)),
                ("exang", yes_no(exang)),
                ("ca", ca.as_str()),
            ],
        )
        .unwrap();
        let values = FeatureVector::assemble(&form).values().to_vec();
        prop_assert_eq!(values.len(), 13);
        prop_assert_eq!(values[1], if female { 0.0 } else { 1.0 });
        prop_assert_eq!(values[5], if fbs { 1.0 } else { 0.0 });
        prop_assert_eq!(values[8], if exang { 1.0 } else { 0.0 });
    }

    #[test]
    fn negative_numeric_input_is_rejected(disease in disease(), value in -1000.0f64..-0.001) {
        let schema = disease.schema();
        let field = schema.fields.iter().find(|f| !f.is_categorical()).unwrap();
        let raw = value.to_string();
        prop_assert!(FormState::from_submission(disease, [(field.key, raw.as_str())]).is_err());
    }
}

// --- Prediction properties ---

proptest! {
    #[test]
    fn identical_vectors_identical_labels(
        weights in prop::collection::vec(-5.0f64..5.0, 1..8),
        intercept in -10.0f64..10.0,
        values in prop::collection::vec(0.0f64..500.0, 22),
    ) {
        let store = ModelStore::from_handles(
            linear(Disease::Diabetes, &weights, intercept),
            linear(Disease::HeartDisease, &weights, intercept),
            linear(Disease::Parkinsons, &weights, intercept),
        )
        .unwrap();
        let vector = FeatureVector::from_values(Disease::Parkinsons, values);
        let first = store.predict(&vector).unwrap();
        for _ in 0..5 {
            prop_assert_eq!(store.predict(&vector).unwrap(), first);
        }
    }

    #[test]
    fn wrong_length_is_an_error(disease in disease(), extra in 1usize..5) {
        let store = ModelStore::from_handles(
            linear(Disease::Diabetes, &[1.0], 0.0),
            linear(Disease::HeartDisease, &[1.0], 0.0),
            linear(Disease::Parkinsons, &[1.0], 0.0),
        )
        .unwrap();
        let n = disease.schema().len() + extra;
        let vector = FeatureVector::from_values(disease, vec![0.0; n]);
        prop_assert!(store.predict(&vector).is_err());
    }
}
