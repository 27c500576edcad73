// Chat relay - Same-origin forwarder from the chat widget to the assistant backend
use crate::application::assistant_proxy::AssistantTransport;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const RELAY_NOT_CONFIGURED: &str = "API base URL is not configured.";
pub const RELAY_UNAVAILABLE: &str = "Assistant service is currently unavailable.";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayReply {
    /// Backend JSON, passed through verbatim
    Forwarded(Value),
    /// Sent to the caller as a 500 with `{"answer": <message>}`
    Failed(&'static str),
}

#[derive(Clone)]
pub struct ChatRelay {
    backend: Arc<dyn AssistantTransport>,
}

impl ChatRelay {
    pub fn new(backend: Arc<dyn AssistantTransport>) -> Self {
        Self { backend }
    }

    /// Re-attaches the caller's token as bearer auth and forwards the question
    pub async fn relay(&self, request: &RelayRequest) -> RelayReply {
        let token = request.token.as_deref().unwrap_or_default();
        match self
            .backend
            .query(&request.question, &request.brand, token)
            .await
        {
            Ok(body) => RelayReply::Forwarded(body),
            Err(e) if e.is_config() => {
                tracing::error!(error = %e, "chat relay has no backend address");
                RelayReply::Failed(RELAY_NOT_CONFIGURED)
            }
            Err(e) => {
                tracing::error!(error = %e, "chat relay forward failed");
                RelayReply::Failed(RELAY_UNAVAILABLE)
            }
        }
    }
}
