// HTTP clients for the analytics backend and the chat relay
use crate::application::assistant_proxy::AssistantTransport;
use crate::application::auth_service::AuthClient;
use crate::application::telemetry_client::{ClientError, TelemetryClient};
use crate::domain::session::{ActiveSession, LoginRequest, LoginResponse};
use crate::domain::telemetry::Subsystem;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MISSING_BASE_URL: &str = "API base URL is not configured";

/// Client for the analytics backend. Every request carries the configured
/// timeout; every authenticated request carries the session's bearer token.
#[derive(Debug, Clone)]
pub struct HttpTelemetryClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl HttpTelemetryClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            http,
        })
    }

    fn build_url(&self, path: &str) -> Result<String, ClientError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| ClientError::Config(MISSING_BASE_URL.to_string()))?;
        Ok(format!("{}{}", base, path))
    }

    async fn get_json(
        &self,
        path: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let url = self.build_url(path)?;
        let request = self.http.get(&url).bearer_auth(token);
        execute(request, &url, cancel).await
    }
}

fn brand_segment(brand: &str) -> String {
    urlencoding::encode(brand).into_owned()
}

/// Sends the request, racing it against the cancellation token
async fn execute(
    request: RequestBuilder,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Value, ClientError> {
    let exchange = async {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(url, "request cancelled");
            Err(ClientError::Cancelled)
        }
        result = exchange => result,
    }
}

#[async_trait]
impl TelemetryClient for HttpTelemetryClient {
    async fn fetch_subsystem(
        &self,
        session: &ActiveSession,
        subsystem: Subsystem,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let path = format!("/{}/{}/{}", brand_segment(&session.brand), subsystem, endpoint);
        self.get_json(&path, &session.token, cancel).await
    }

    async fn fetch_summary(
        &self,
        session: &ActiveSession,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let path = format!("/{}/summary", brand_segment(&session.brand));
        self.get_json(&path, &session.token, cancel).await
    }

    async fn fetch_ranking(
        &self,
        session: &ActiveSession,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        self.get_json("/ranking", &session.token, cancel).await
    }
}

#[async_trait]
impl AuthClient for HttpTelemetryClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let url = self.build_url("/auth/login")?;
        let body = execute(
            self.http.post(&url).json(request),
            &url,
            &CancellationToken::new(),
        )
        .await?;

        serde_json::from_value(body).map_err(|e| ClientError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

/// Direct path: `POST /mcp/query` with bearer auth
#[async_trait]
impl AssistantTransport for HttpTelemetryClient {
    async fn query(&self, question: &str, brand: &str, token: &str) -> Result<Value, ClientError> {
        let url = self.build_url("/mcp/query")?;
        let request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "question": question, "brand": brand }));
        execute(request, &url, &CancellationToken::new()).await
    }
}

/// Relay path: `POST /api/chat` on the same origin, which re-attaches the
/// token server-side and supplies the backend address.
#[derive(Debug, Clone)]
pub struct RelayAssistantClient {
    relay_url: String,
    http: reqwest::Client,
}

impl RelayAssistantClient {
    pub fn new(relay_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            relay_url: relay_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl AssistantTransport for RelayAssistantClient {
    async fn query(&self, question: &str, brand: &str, token: &str) -> Result<Value, ClientError> {
        let url = format!("{}/api/chat", self.relay_url);
        let request = self.http.post(&url).json(&json!({
            "question": question,
            "brand": brand,
            "token": token,
        }));
        execute(request, &url, &CancellationToken::new()).await
    }
}
