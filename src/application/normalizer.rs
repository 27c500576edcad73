// Normalizer - Maps variable-shaped backend JSON into canonical records
//
// Nothing here fails. Malformed input is absorbed by defaults (0, "", "Unknown")
// because the backend's shapes have drifted between releases.
use crate::domain::ranking::RankingEntry;
use crate::domain::telemetry::{DistributionBucket, FleetSummary, MetricSeriesPoint, SeriesFields};
use serde_json::{Number, Value};

const UNKNOWN_LABEL: &str = "Unknown";

/// Supported wire shapes of a distribution row
#[derive(Debug, PartialEq)]
enum DistributionRow<'a> {
    /// `{"label": ..., "value": ...}`
    Named {
        label: Option<&'a Value>,
        value: Option<&'a Value>,
    },
    /// Anonymous pair: first own value is the label, second the count.
    /// Objects are read in key insertion order, arrays in element order.
    Positional(Vec<&'a Value>),
}

impl<'a> DistributionRow<'a> {
    fn parse(row: &'a Value) -> Self {
        match row {
            Value::Object(map) if map.contains_key("label") && map.contains_key("value") => {
                DistributionRow::Named {
                    label: map.get("label"),
                    value: map.get("value"),
                }
            }
            Value::Object(map) => DistributionRow::Positional(map.values().collect()),
            Value::Array(items) => DistributionRow::Positional(items.iter().collect()),
            _ => DistributionRow::Positional(Vec::new()),
        }
    }

    fn into_bucket(self) -> DistributionBucket {
        let (label, count) = match self {
            DistributionRow::Named { label, value } => (label, value),
            DistributionRow::Positional(values) => (values.first().copied(), values.get(1).copied()),
        };
        DistributionBucket::new(coerce_label(label, UNKNOWN_LABEL), coerce_number(count))
    }
}

/// Temperature-band series. Non-array input yields an empty series.
pub fn to_metric_series(raw: &Value, fields: SeriesFields) -> Vec<MetricSeriesPoint> {
    let Some(rows) = raw.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            MetricSeriesPoint::new(
                coerce_label(first_present(row, &fields.label_keys), ""),
                coerce_number(first_present(row, &fields.value_keys)),
            )
        })
        .collect()
}

/// Pie breakdown. Non-array input yields no buckets.
pub fn to_distribution(raw: &Value) -> Vec<DistributionBucket> {
    let Some(rows) = raw.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| DistributionRow::parse(row).into_bucket())
        .collect()
}

/// Reads the `ranking` list of the ranking response (a bare list is accepted too).
/// Entries without a brand or with a rank below 1 are dropped.
pub fn to_ranking_entries(raw: &Value) -> Vec<RankingEntry> {
    let rows = raw
        .get("ranking")
        .and_then(Value::as_array)
        .or_else(|| raw.as_array());
    let Some(rows) = rows else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let brand = coerce_label(row.get("brand"), "");
            let rank = coerce_number(row.get("rank")).round();
            if brand.trim().is_empty() || rank < 1.0 {
                tracing::warn!(brand = %brand, rank, "skipping malformed ranking entry");
                return None;
            }
            Some(RankingEntry::new(
                brand,
                coerce_number(row.get("fleet_health_score")),
                rank as u32,
            ))
        })
        .collect()
}

pub fn to_fleet_summary(raw: &Value) -> FleetSummary {
    FleetSummary {
        fleet_health_score: coerce_number(raw.get("fleet_health_score")),
        total_vehicles: coerce_number(raw.get("total_vehicles")).max(0.0) as u64,
    }
}

/// First key in preference order holding a non-null value
fn first_present<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| row.get(*key).filter(|value| !value.is_null()))
}

/// Lossy numeric coercion: numbers as-is, numeric strings parsed, booleans 1/0,
/// everything else (including non-finite results) 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if number.is_finite() { number } else { 0.0 }
}

/// Scalar-to-text coercion; null, absent and composite values take the default
pub fn coerce_label(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Integral values print without a trailing ".0"
fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
