// Ranking domain models
use serde::Serialize;

/// One brand's position in the global league
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub brand: String,
    pub health_score: f64,
    pub rank: u32,
}

impl RankingEntry {
    pub fn new(brand: String, health_score: f64, rank: u32) -> Self {
        Self {
            brand,
            health_score,
            rank,
        }
    }
}

/// Bar chart row derived from a ranking entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub brand: String,
    pub brand_label: String,
    pub health_score: f64,
    pub rank: u32,
    pub rank_height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Row of the brand rankings list shown under the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub position: usize,
    pub brand: String,
    pub health_score: f64,
    pub medal: Option<Medal>,
    pub own_brand: bool,
}

/// Convert "mercedes-benz" to "Mercedes Benz"
pub fn brand_label(brand: &str) -> String {
    brand
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
