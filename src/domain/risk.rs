// Risk assessment domain model
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Low Risk")]
    Low,
    Unknown,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk",
            RiskLabel::Low => "Low Risk",
            RiskLabel::Unknown => "Unknown",
        }
    }

    /// Parses a label as the backend spells it; anything else is Unknown
    pub fn from_backend(label: &str) -> Self {
        match label.trim() {
            "High Risk" => RiskLabel::High,
            "Low Risk" => RiskLabel::Low,
            _ => RiskLabel::Unknown,
        }
    }

    /// Colour used for the headline and the confidence bar
    pub fn color(&self) -> &'static str {
        match self {
            RiskLabel::High => "#ef4444",
            _ => "#22c55e",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical risk verdict for one subsystem.
///
/// `confidence_percent` is not clamped: a backend fraction outside [0, 1]
/// shows up here as a percentage outside [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub label: RiskLabel,
    pub confidence_percent: i64,
}

impl RiskAssessment {
    pub fn new(label: RiskLabel, confidence_percent: i64) -> Self {
        Self {
            label,
            confidence_percent,
        }
    }

    pub fn unknown() -> Self {
        Self::new(RiskLabel::Unknown, 0)
    }
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::unknown()
    }
}
