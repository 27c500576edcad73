// Client trait for the analytics backend
use crate::domain::session::ActiveSession;
use crate::domain::telemetry::Subsystem;
use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Failure of one backend request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A required external address is missing. Raised before any I/O.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or timeout
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// 2xx response whose body was not the expected JSON
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn is_config(&self) -> bool {
        matches!(self, ClientError::Config(_))
    }

    /// Failures recovered at the page boundary
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Status { .. } | ClientError::Decode { .. }
        )
    }
}

#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// `GET /{brand}/{subsystem}/{endpoint}`
    async fn fetch_subsystem(
        &self,
        session: &ActiveSession,
        subsystem: Subsystem,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError>;

    /// `GET /{brand}/summary`
    async fn fetch_summary(
        &self,
        session: &ActiveSession,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError>;

    /// `GET /ranking`
    async fn fetch_ranking(
        &self,
        session: &ActiveSession,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError>;
}
