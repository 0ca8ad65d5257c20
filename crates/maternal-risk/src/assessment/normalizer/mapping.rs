use std::collections::HashMap;
use std::sync::OnceLock;

use super::super::domain::Condition;
use super::encoding::normalize_label;
use self::FieldKind::{Flag, Measure, Ordinal, Trimester};
use super::super::domain::Condition::{
    Anaemia, Gdm, MentalHealth, Miscarriage, Preeclampsia, Thyroid, Uti,
};

/// How a raw field is decoded before it reaches an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Flag,
    Ordinal,
    Measure,
    Trimester,
}

/// One destination of a raw field: which condition receives it, under what key.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldTarget {
    pub(crate) condition: Condition,
    pub(crate) key: &'static str,
    pub(crate) kind: FieldKind,
}

const fn target(condition: Condition, key: &'static str, kind: FieldKind) -> FieldTarget {
    FieldTarget {
        condition,
        key,
        kind,
    }
}

/// Raw collector fields and every evaluator input they feed. Some fields are
/// shared: `fatigue` is a presence flag for the anaemia screen and thyroid but
/// a severity slider for GDM and the anaemia tracker (`fatigue_level`).
const FIELDS: &[(&str, &[FieldTarget])] = &[
    (
        "age",
        &[
            target(Anaemia, "age", Measure),
            target(Miscarriage, "age", Measure),
            target(Gdm, "age", Measure),
        ],
    ),
    (
        "bmi",
        &[
            target(Thyroid, "bmi", Measure),
            target(Miscarriage, "bmi", Measure),
            target(Gdm, "bmi", Measure),
        ],
    ),
    ("trimester", &[target(Anaemia, "trimester", Trimester)]),
    (
        "fatigue",
        &[
            target(Anaemia, "fatigue", Flag),
            target(Anaemia, "fatigue_level", Ordinal),
            target(Thyroid, "fatigue", Flag),
            target(Gdm, "fatigue", Ordinal),
        ],
    ),
    ("pale_skin", &[target(Anaemia, "pale_skin", Flag)]),
    (
        "dizziness",
        &[
            target(Anaemia, "dizziness", Flag),
            target(Anaemia, "dizziness_level", Ordinal),
        ],
    ),
    (
        "shortness_of_breath",
        &[
            target(Anaemia, "shortness_of_breath", Flag),
            target(Anaemia, "breathlessness_level", Ordinal),
        ],
    ),
    ("cravings", &[target(Anaemia, "cravings", Flag)]),
    ("iron_diet", &[target(Anaemia, "iron_diet", Ordinal)]),
    (
        "headache",
        &[
            target(Anaemia, "headache", Flag),
            target(Preeclampsia, "headache", Ordinal),
        ],
    ),
    ("cold_hands_feet", &[target(Anaemia, "cold_hands_feet", Flag)]),
    (
        "history_of_anaemia",
        &[target(Anaemia, "history_of_anaemia", Flag)],
    ),
    ("weight_gain", &[target(Thyroid, "weight_gain", Flag)]),
    ("cold_intolerance", &[target(Thyroid, "cold_intolerance", Flag)]),
    ("constipation", &[target(Thyroid, "constipation", Flag)]),
    ("hair_loss", &[target(Thyroid, "hair_loss", Flag)]),
    ("palpitations", &[target(Thyroid, "palpitations", Flag)]),
    (
        "menstrual_irregularity",
        &[target(Thyroid, "menstrual_irregularity", Flag)],
    ),
    ("tsh", &[target(Thyroid, "tsh", Measure)]),
    ("t3", &[target(Thyroid, "t3", Measure)]),
    ("t4", &[target(Thyroid, "t4", Measure)]),
    (
        "family_history_thyroid",
        &[target(Thyroid, "family_history", Flag)],
    ),
    (
        "high_blood_pressure",
        &[target(Miscarriage, "high_blood_pressure", Flag)],
    ),
    ("bleeding", &[target(Miscarriage, "bleeding", Flag)]),
    ("cramping", &[target(Miscarriage, "cramping", Flag)]),
    ("stress_level", &[target(Miscarriage, "stress_level", Ordinal)]),
    (
        "previous_miscarriage",
        &[target(Miscarriage, "previous_miscarriage", Flag)],
    ),
    (
        "thyroid_disorder",
        &[target(Miscarriage, "thyroid_disorder", Flag)],
    ),
    (
        "diabetes",
        &[
            target(Miscarriage, "diabetes", Flag),
            target(Preeclampsia, "diabetes", Flag),
        ],
    ),
    ("smoking", &[target(Miscarriage, "smoking", Flag)]),
    ("alcohol", &[target(Miscarriage, "alcohol", Flag)]),
    ("hemoglobin", &[target(Miscarriage, "hemoglobin", Measure)]),
    ("blood_sugar", &[target(Miscarriage, "blood_sugar", Measure)]),
    (
        "frequent_urination",
        &[
            target(Uti, "frequent_urination", Flag),
            target(Gdm, "frequent_urination", Ordinal),
        ],
    ),
    ("burning_sensation", &[target(Uti, "burning_sensation", Flag)]),
    (
        "lower_abdominal_pain",
        &[target(Uti, "lower_abdominal_pain", Flag)],
    ),
    ("fever", &[target(Uti, "fever", Flag)]),
    ("cloudy_urine", &[target(Uti, "cloudy_urine", Flag)]),
    ("blood_in_urine", &[target(Uti, "blood_in_urine", Flag)]),
    ("history_of_uti", &[target(Uti, "history_of_uti", Flag)]),
    ("thirst_level", &[target(Gdm, "thirst", Ordinal)]),
    ("hunger", &[target(Gdm, "hunger", Ordinal)]),
    (
        "blurred_vision",
        &[
            target(Gdm, "blurred_vision", Flag),
            target(Preeclampsia, "blurred_vision", Flag),
        ],
    ),
    (
        "heart_rate",
        &[
            target(Anaemia, "heart_rate", Measure),
            target(Gdm, "heart_rate", Measure),
        ],
    ),
    ("previous_gdm", &[target(Gdm, "previous_gdm", Flag)]),
    (
        "family_history_diabetes",
        &[target(Gdm, "family_history_diabetes", Flag)],
    ),
    ("pcos", &[target(Gdm, "pcos", Flag)]),
    ("fasting_glucose", &[target(Gdm, "fasting_glucose", Measure)]),
    (
        "post_meal_glucose",
        &[target(Gdm, "post_meal_glucose", Measure)],
    ),
    ("urine_sugar", &[target(Gdm, "urine_sugar", Ordinal)]),
    ("bp", &[target(Preeclampsia, "systolic", Measure)]),
    ("swelling", &[target(Preeclampsia, "swelling", Flag)]),
    ("urine_output", &[target(Preeclampsia, "urination", Ordinal)]),
    (
        "chronic_hypertension",
        &[target(Preeclampsia, "chronic_hypertension", Flag)],
    ),
    ("mood", &[target(MentalHealth, "mood", Ordinal)]),
    ("anxiety", &[target(MentalHealth, "anxiety", Ordinal)]),
    (
        "sleep_disturbance",
        &[target(MentalHealth, "sleep_disturbance", Ordinal)],
    ),
    (
        "feeling_overwhelmed",
        &[target(MentalHealth, "feeling_overwhelmed", Ordinal)],
    ),
    ("hopelessness", &[target(MentalHealth, "hopelessness", Ordinal)]),
    ("harm_thoughts", &[target(MentalHealth, "harm_thoughts", Flag)]),
    ("support_level", &[target(MentalHealth, "support_level", Ordinal)]),
];

/// Alternate spellings seen in collector payloads and CSV exports.
const ALIASES: &[(&str, &str)] = &[
    ("breathlessness", "shortness_of_breath"),
    ("history_of_anemia", "history_of_anaemia"),
    ("previous_anaemia", "history_of_anaemia"),
    ("cold_extremities", "cold_hands_feet"),
    ("pica", "cravings"),
    ("iron_diet_score", "iron_diet"),
    ("family_history", "family_history_thyroid"),
    ("lab_hemoglobin", "hemoglobin"),
    ("lab_blood_sugar", "blood_sugar"),
    ("burning_urination", "burning_sensation"),
    ("thirst", "thirst_level"),
    ("increased_hunger", "hunger"),
    ("fasting", "fasting_glucose"),
    ("post_meal", "post_meal_glucose"),
    ("systolic", "bp"),
    ("systolic_bp", "bp"),
    ("urination", "urine_output"),
];

/// Multi-select symptom labels and the raw flag field each one sets.
const SYMPTOM_LABELS: &[(&str, &str)] = &[
    ("fatigue", "fatigue"),
    ("tiredness", "fatigue"),
    ("pale skin", "pale_skin"),
    ("dizziness", "dizziness"),
    ("shortness of breath", "shortness_of_breath"),
    ("breathlessness", "shortness_of_breath"),
    ("headache", "headache"),
    ("cold hands and feet", "cold_hands_feet"),
    ("cold hands & feet", "cold_hands_feet"),
    ("cravings", "cravings"),
    ("unusual cravings", "cravings"),
    ("pica", "cravings"),
    ("weight gain", "weight_gain"),
    ("cold intolerance", "cold_intolerance"),
    ("constipation", "constipation"),
    ("hair loss", "hair_loss"),
    ("palpitations", "palpitations"),
    ("menstrual irregularity", "menstrual_irregularity"),
    ("bleeding", "bleeding"),
    ("spotting", "bleeding"),
    ("cramping", "cramping"),
    ("frequent urination", "frequent_urination"),
    ("burning sensation", "burning_sensation"),
    ("burning urination", "burning_sensation"),
    ("lower abdominal pain", "lower_abdominal_pain"),
    ("abdominal pain", "lower_abdominal_pain"),
    ("fever", "fever"),
    ("cloudy urine", "cloudy_urine"),
    ("blood in urine", "blood_in_urine"),
    ("blurred vision", "blurred_vision"),
    ("swelling", "swelling"),
];

/// Field carrying the multi-select symptom list.
pub(crate) const SELECTION_FIELD: &str = "symptoms";

static FIELD_MAP: OnceLock<HashMap<&'static str, &'static [FieldTarget]>> = OnceLock::new();
static LABEL_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Resolve a normalized raw field (or one of its aliases) to its canonical
/// name and destinations.
pub(crate) fn targets_for(field: &str) -> Option<(&'static str, &'static [FieldTarget])> {
    let map = FIELD_MAP.get_or_init(|| FIELDS.iter().copied().collect());
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == field)
        .map_or(field, |(_, canonical)| *canonical);

    map.get_key_value(canonical)
        .map(|(name, targets)| (*name, *targets))
}

pub(crate) fn field_for_label(label: &str) -> Option<&'static str> {
    LABEL_MAP
        .get_or_init(|| {
            SYMPTOM_LABELS
                .iter()
                .map(|(label, field)| (normalize_label(label), *field))
                .collect()
        })
        .get(&normalize_label(label))
        .copied()
}
