use serde_json::json;

use super::common::*;
use crate::assessment::domain::{Condition, InputValue};
use crate::assessment::normalizer::{InputNormalizer, NormalizationError, RawAssessmentRequest};

#[test]
fn shared_fields_fan_out_with_per_condition_types() {
    let inputs = InputNormalizer::new()
        .normalize(&answers())
        .expect("answers normalize");

    let uti = &inputs[&Condition::Uti];
    assert_eq!(uti.get("frequent_urination"), Some(&InputValue::Flag(true)));
    assert_eq!(uti.get("burning_sensation"), Some(&InputValue::Flag(true)));

    let gdm = &inputs[&Condition::Gdm];
    assert_eq!(gdm.get("frequent_urination"), Some(&InputValue::Ordinal(1)));
    assert_eq!(gdm.get("fatigue"), Some(&InputValue::Ordinal(1)));

    let anaemia = &inputs[&Condition::Anaemia];
    assert_eq!(
        anaemia.get("trimester"),
        Some(&InputValue::Category("Third".to_string()))
    );
    assert_eq!(anaemia.get("pale_skin"), Some(&InputValue::Flag(true)));
    assert_eq!(anaemia.get("fatigue"), Some(&InputValue::Flag(true)));
}

#[test]
fn untouched_conditions_are_omitted() {
    let inputs = InputNormalizer::new()
        .normalize(&RawAssessmentRequest::new().with("fever", "Yes"))
        .expect("normalizes");

    assert_eq!(inputs.keys().copied().collect::<Vec<_>>(), vec![Condition::Uti]);
}

#[test]
fn explicit_field_wins_over_symptom_list() {
    let raw = RawAssessmentRequest::new()
        .with("Fever", "No")
        .with("symptoms", "Fever, Cloudy Urine, Sneezing");

    let inputs = InputNormalizer::new().normalize(&raw).expect("normalizes");

    let uti = &inputs[&Condition::Uti];
    assert_eq!(uti.get("fever"), Some(&InputValue::Flag(false)));
    assert_eq!(uti.get("cloudy_urine"), Some(&InputValue::Flag(true)));
    assert_eq!(uti.len(), 2);
}

#[test]
fn aliases_and_encoded_sliders_are_decoded() {
    let raw = RawAssessmentRequest::new()
        .with("Systolic BP", "150")
        .with("Headache", "4 - Severe")
        .with("urine_sugar", "++")
        .with("lab_hemoglobin", 9.5)
        .with("TSH", 0)
        .with("mood", "1 - Very low");

    let inputs = InputNormalizer::new().normalize(&raw).expect("normalizes");

    let preeclampsia = &inputs[&Condition::Preeclampsia];
    assert_eq!(preeclampsia.get("systolic"), Some(&InputValue::Measure(150.0)));
    assert_eq!(preeclampsia.get("headache"), Some(&InputValue::Ordinal(4)));
    // The same slider reads as a presence flag for anaemia.
    assert_eq!(
        inputs[&Condition::Anaemia].get("headache"),
        Some(&InputValue::Flag(true))
    );
    assert_eq!(
        inputs[&Condition::Gdm].get("urine_sugar"),
        Some(&InputValue::Ordinal(2))
    );
    assert_eq!(
        inputs[&Condition::Miscarriage].get("hemoglobin"),
        Some(&InputValue::Measure(9.5))
    );
    assert_eq!(
        inputs[&Condition::MentalHealth].get("mood"),
        Some(&InputValue::Ordinal(1))
    );
    // A zero lab value means "not tested".
    assert!(!inputs.contains_key(&Condition::Thyroid));
}

#[test]
fn malformed_values_name_the_raw_field() {
    let raw = RawAssessmentRequest::new().with("Blood_Sugar", "high");

    match InputNormalizer::new().normalize(&raw) {
        Err(NormalizationError::InvalidMeasure { field, .. }) => assert_eq!(field, "Blood_Sugar"),
        other => panic!("expected invalid measure, got {other:?}"),
    }
}

#[test]
fn non_text_symptom_entries_are_rejected() {
    let raw = RawAssessmentRequest::new().with("symptoms", json!(["Fever", 3]));

    assert!(matches!(
        InputNormalizer::new().normalize(&raw),
        Err(NormalizationError::InvalidSelection { .. })
    ));
}

#[test]
fn raw_requests_deserialize_from_flat_json() {
    let raw: RawAssessmentRequest =
        serde_json::from_value(json!({ "Fatigue": true, "bmi": "31.5" })).expect("flat object");

    let inputs = InputNormalizer::new().normalize(&raw).expect("normalizes");

    assert_eq!(
        inputs[&Condition::Thyroid].get("bmi"),
        Some(&InputValue::Measure(31.5))
    );
    assert_eq!(
        inputs[&Condition::Gdm].get("fatigue"),
        Some(&InputValue::Ordinal(1))
    );
}

#[test]
fn tracker_fields_reach_the_anaemia_input() {
    let raw = RawAssessmentRequest::new()
        .with("cravings", true)
        .with("Iron_Diet_Score", "1 - Very low")
        .with("heart_rate", 110)
        .with("Dizziness", "3 - Often");

    let inputs = InputNormalizer::new().normalize(&raw).expect("normalizes");

    let anaemia = inputs.get(&Condition::Anaemia).expect("anaemia input present");
    assert_eq!(anaemia.get("cravings"), Some(&InputValue::Flag(true)));
    assert_eq!(anaemia.get("iron_diet"), Some(&InputValue::Ordinal(1)));
    assert_eq!(anaemia.get("heart_rate"), Some(&InputValue::Measure(110.0)));
    assert_eq!(anaemia.get("dizziness"), Some(&InputValue::Flag(true)));
    assert_eq!(anaemia.get("dizziness_level"), Some(&InputValue::Ordinal(3)));
    assert_eq!(
        inputs[&Condition::Gdm].get("heart_rate"),
        Some(&InputValue::Measure(110.0))
    );
}
