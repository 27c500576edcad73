// Dashboard service - Loads one page's endpoints concurrently and builds its page model
use crate::application::normalizer::{
    to_distribution, to_fleet_summary, to_metric_series, to_ranking_entries,
};
use crate::application::ranking_aggregator::{accent_color, build_chart_rows, is_own_brand, leaderboard};
use crate::application::risk_classifier::classify;
use crate::application::telemetry_client::{ClientError, TelemetryClient};
use crate::domain::ranking::{ChartRow, LeaderboardEntry};
use crate::domain::risk::RiskAssessment;
use crate::domain::session::ActiveSession;
use crate::domain::telemetry::{DistributionBucket, FleetSummary, MetricSeriesPoint, Subsystem};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const CONFIG_NOTICE: &str = "API base URL not configured";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub message: String,
}

/// Endpoint failures of one page load. A failed endpoint renders with defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageFailures {
    pub failures: Vec<EndpointFailure>,
    pub notice: Option<String>,
}

impl PageFailures {
    fn record(&mut self, endpoint: &str, error: &ClientError) {
        if error.is_config() {
            tracing::warn!(endpoint, error = %error, "backend address not configured");
            self.notice = Some(CONFIG_NOTICE.to_string());
        } else if error.is_transport() {
            tracing::warn!(endpoint, error = %error, "endpoint failed, rendering defaults");
        } else {
            tracing::debug!(endpoint, "endpoint request cancelled");
        }
        self.failures.push(EndpointFailure {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        });
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemPage {
    pub subsystem: Subsystem,
    pub title: &'static str,
    pub series_title: &'static str,
    pub series: Vec<MetricSeriesPoint>,
    pub distribution_title: &'static str,
    pub distribution: Vec<DistributionBucket>,
    pub risk_title: &'static str,
    pub risk: RiskAssessment,
    pub risk_color: &'static str,
    #[serde(flatten)]
    pub status: PageFailures,
}

/// Ranking chart bar with the caller's highlight applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingBar {
    #[serde(flatten)]
    pub row: ChartRow,
    pub own_brand: bool,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPage {
    pub brand: String,
    pub greeting: String,
    pub summary: Option<FleetSummary>,
    pub ranking: Vec<RankingBar>,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(flatten)]
    pub status: PageFailures,
}

/// Page model for whichever view is mounted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedPage {
    Overview(OverviewPage),
    Subsystem(SubsystemPage),
}

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<dyn TelemetryClient>,
}

impl DashboardService {
    pub fn new(client: Arc<dyn TelemetryClient>) -> Self {
        Self { client }
    }

    /// Series, distribution and risk are fetched concurrently and joined
    /// before the page is built.
    pub async fn load_subsystem(
        &self,
        session: &ActiveSession,
        subsystem: Subsystem,
        cancel: &CancellationToken,
    ) -> SubsystemPage {
        let series_endpoint = subsystem.series_endpoint();
        let distribution_endpoint = subsystem.distribution_endpoint();
        let risk_endpoint = subsystem.risk_endpoint();

        let (series, distribution, risk) = futures::join!(
            self.client.fetch_subsystem(session, subsystem, series_endpoint, cancel),
            self.client.fetch_subsystem(session, subsystem, distribution_endpoint, cancel),
            self.client.fetch_subsystem(session, subsystem, risk_endpoint, cancel),
        );

        let mut status = PageFailures::default();
        let series = match series {
            Ok(raw) => to_metric_series(&raw, subsystem.series_fields()),
            Err(e) => {
                status.record(series_endpoint, &e);
                Vec::new()
            }
        };
        let distribution = match distribution {
            Ok(raw) => to_distribution(&raw),
            Err(e) => {
                status.record(distribution_endpoint, &e);
                Vec::new()
            }
        };
        let risk = match risk {
            Ok(raw) => classify(&raw, subsystem.risk_flag_key()),
            Err(e) => {
                status.record(risk_endpoint, &e);
                RiskAssessment::unknown()
            }
        };

        tracing::info!(
            brand = %session.brand,
            subsystem = %subsystem,
            points = series.len(),
            buckets = distribution.len(),
            risk = %risk.label,
            degraded = status.is_degraded(),
            "loaded subsystem page"
        );

        let titles = subsystem.titles();
        SubsystemPage {
            subsystem,
            title: titles.page,
            series_title: titles.series,
            series,
            distribution_title: titles.distribution,
            distribution,
            risk_title: titles.risk,
            risk_color: risk.label.color(),
            risk,
            status,
        }
    }

    /// Fleet summary and global ranking, fetched concurrently
    pub async fn load_overview(
        &self,
        session: &ActiveSession,
        cancel: &CancellationToken,
    ) -> OverviewPage {
        let (summary, ranking) = futures::join!(
            self.client.fetch_summary(session, cancel),
            self.client.fetch_ranking(session, cancel),
        );

        let mut status = PageFailures::default();
        let summary = match summary {
            Ok(raw) => Some(to_fleet_summary(&raw)),
            Err(e) => {
                status.record("summary", &e);
                None
            }
        };
        let entries = match ranking {
            Ok(raw) => to_ranking_entries(&raw),
            Err(e) => {
                status.record("ranking", &e);
                Vec::new()
            }
        };

        let rows = build_chart_rows(&entries);
        let leaderboard = leaderboard(&rows, &session.brand);
        let ranking = rows
            .into_iter()
            .map(|row| RankingBar {
                own_brand: is_own_brand(&row.brand, &session.brand),
                color: accent_color(&row, &session.brand),
                row,
            })
            .collect();

        OverviewPage {
            brand: session.brand.clone(),
            greeting: format!("Hello Team {}", session.brand.to_uppercase()),
            summary,
            ranking,
            leaderboard,
            status,
        }
    }
}
