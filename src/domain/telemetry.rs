// Telemetry domain models
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An independent telemetry domain with its own series, distribution and risk endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Engine,
    Battery,
    Brakes,
}

/// Field preference order for one subsystem's temperature series.
/// The first key holding a non-null value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesFields {
    pub label_keys: [&'static str; 2],
    pub value_keys: [&'static str; 2],
}

/// Display titles for one subsystem page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTitles {
    pub page: &'static str,
    pub series: &'static str,
    pub distribution: &'static str,
    pub risk: &'static str,
}

impl Subsystem {
    pub const ALL: [Subsystem; 3] = [Subsystem::Engine, Subsystem::Battery, Subsystem::Brakes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Engine => "engine",
            Subsystem::Battery => "battery",
            Subsystem::Brakes => "brakes",
        }
    }

    pub fn series_endpoint(&self) -> &'static str {
        "temp-performance"
    }

    pub fn distribution_endpoint(&self) -> &'static str {
        match self {
            Subsystem::Brakes => "wear-distribution",
            _ => "distribution",
        }
    }

    pub fn risk_endpoint(&self) -> &'static str {
        "risk"
    }

    pub fn series_fields(&self) -> SeriesFields {
        match self {
            Subsystem::Engine => SeriesFields {
                label_keys: ["temp_band", "temperature"],
                value_keys: ["avg_engine_performance_percent", "performance"],
            },
            Subsystem::Battery => SeriesFields {
                label_keys: ["temp_band", "temperature"],
                value_keys: ["avg_battery_health_percent", "health"],
            },
            // The brakes backend reshapes its rows before sending them
            Subsystem::Brakes => SeriesFields {
                label_keys: ["temperature", "temp_band"],
                value_keys: ["wear", "avg_brake_wear_percent"],
            },
        }
    }

    /// Column carrying the binary imminent-failure flag in risk rows
    pub fn risk_flag_key(&self) -> &'static str {
        match self {
            Subsystem::Engine => "engine_failure_imminent",
            Subsystem::Battery => "battery_issue_imminent",
            Subsystem::Brakes => "brake_issue_imminent",
        }
    }

    pub fn titles(&self) -> PageTitles {
        match self {
            Subsystem::Engine => PageTitles {
                page: "Engine Insights",
                series: "Temperature vs Performance",
                distribution: "Performance Distribution",
                risk: "Engine Risk Summary",
            },
            Subsystem::Battery => PageTitles {
                page: "Battery Insights",
                series: "Temperature vs Battery Health",
                distribution: "Battery Health Distribution",
                risk: "Battery Risk Summary",
            },
            Subsystem::Brakes => PageTitles {
                page: "Brake Insights",
                series: "Temperature vs Brake Wear",
                distribution: "Brake Wear Distribution",
                risk: "Brake Risk Summary",
            },
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subsystem: {0}")]
pub struct UnknownSubsystem(pub String);

impl FromStr for Subsystem {
    type Err = UnknownSubsystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subsystem::ALL
            .into_iter()
            .find(|sub| sub.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSubsystem(s.to_string()))
    }
}

/// One point of a temperature/condition-vs-metric series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesPoint {
    pub bucket_label: String,
    pub value: f64,
}

impl MetricSeriesPoint {
    pub fn new(bucket_label: String, value: f64) -> Self {
        Self {
            bucket_label,
            value,
        }
    }
}

/// One slice of a pie breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: f64,
}

impl DistributionBucket {
    pub fn new(label: String, count: f64) -> Self {
        Self { label, count }
    }
}

/// Headline numbers for the caller's own fleet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub fleet_health_score: f64,
    pub total_vehicles: u64,
}
