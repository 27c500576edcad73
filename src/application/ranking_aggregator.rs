// Ranking aggregator - Chart rows and leaderboard from the global ranking
use crate::domain::ranking::{brand_label, ChartRow, LeaderboardEntry, Medal, RankingEntry};

/// Displayed league size; rank 1 gets a bar of this height
pub const MAX_RANK_SLOTS: i64 = 10;

pub const LEADERBOARD_SIZE: usize = 10;

pub const OWN_BRAND_COLOR: &str = "#22c55e";
pub const OTHER_BRAND_COLOR: &str = "#7aa2f7";

/// Stable sort by rank ascending; ties keep their input order.
pub fn build_chart_rows(entries: &[RankingEntry]) -> Vec<ChartRow> {
    let mut sorted: Vec<&RankingEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.rank);

    sorted
        .into_iter()
        .map(|entry| ChartRow {
            brand: entry.brand.clone(),
            brand_label: brand_label(&entry.brand),
            health_score: entry.health_score,
            rank: entry.rank,
            rank_height: (MAX_RANK_SLOTS + 1) - i64::from(entry.rank),
        })
        .collect()
}

pub fn is_own_brand(brand: &str, session_brand: &str) -> bool {
    brand.to_lowercase() == session_brand.to_lowercase()
}

pub fn accent_color(row: &ChartRow, session_brand: &str) -> &'static str {
    if is_own_brand(&row.brand, session_brand) {
        OWN_BRAND_COLOR
    } else {
        OTHER_BRAND_COLOR
    }
}

/// Top of the league with medal tiers and the caller's badge
pub fn leaderboard(rows: &[ChartRow], session_brand: &str) -> Vec<LeaderboardEntry> {
    rows.iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(index, row)| {
            let position = index + 1;
            LeaderboardEntry {
                position,
                brand: row.brand.clone(),
                health_score: row.health_score,
                medal: Medal::for_position(position),
                own_brand: is_own_brand(&row.brand, session_brand),
            }
        })
        .collect()
}
