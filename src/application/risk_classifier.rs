// Risk classifier - Canonical risk verdicts from either backend shape
use crate::application::normalizer::coerce_number;
use crate::domain::risk::{RiskAssessment, RiskLabel};
use serde_json::{Map, Value};

const FRACTION_KEY: &str = "fraction";

/// Dispatches on shape: rows (array) or a pre-classified object.
/// Anything else is Unknown.
pub fn classify(raw: &Value, flag_key: &str) -> RiskAssessment {
    match raw {
        Value::Array(rows) => classify_from_rows(rows, flag_key),
        Value::Object(obj) => classify_from_object(obj),
        _ => RiskAssessment::unknown(),
    }
}

/// First row carries the imminent-failure flag and a fraction in [0, 1].
/// Flag equal to 1 means High Risk; any other value means Low Risk.
pub fn classify_from_rows(rows: &[Value], flag_key: &str) -> RiskAssessment {
    let Some(row) = rows.first() else {
        return RiskAssessment::unknown();
    };

    let label = if coerce_number(row.get(flag_key)) == 1.0 {
        RiskLabel::High
    } else {
        RiskLabel::Low
    };
    let fraction = coerce_number(row.get(FRACTION_KEY));

    RiskAssessment::new(label, to_percent(fraction * 100.0))
}

/// `{"risk": "High Risk", "confidence": 42.0}` where confidence is already a percentage
pub fn classify_from_object(obj: &Map<String, Value>) -> RiskAssessment {
    let label = obj
        .get("risk")
        .and_then(Value::as_str)
        .map(RiskLabel::from_backend)
        .unwrap_or(RiskLabel::Unknown);

    RiskAssessment::new(label, to_percent(coerce_number(obj.get("confidence"))))
}

/// Round half away from zero. Out-of-range values pass through unclamped.
fn to_percent(value: f64) -> i64 {
    value.round() as i64
}
