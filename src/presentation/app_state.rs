// Application state for HTTP handlers
use crate::application::assistant_proxy::{AssistantProxy, AssistantTransport, ChatSession};
use crate::application::auth_service::AuthService;
use crate::application::chat_relay::ChatRelay;
use crate::application::dashboard_service::{DashboardService, RenderedPage};
use crate::application::session_store::SessionStore;
use crate::application::view_registry::ViewRegistry;
use crate::infrastructure::http_client::HttpTelemetryClient;
use std::sync::Arc;

pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub auth_service: AuthService,
    pub dashboard_service: DashboardService,
    pub views: ViewRegistry<RenderedPage>,
    pub chat: Arc<ChatSession>,
    pub relay: ChatRelay,
}

impl AppState {
    /// `backend` serves telemetry, login and the relay's upstream;
    /// `assistant` is the chat widget's path (direct or relay).
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        backend: Arc<HttpTelemetryClient>,
        assistant: Arc<dyn AssistantTransport>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(backend.clone(), sessions.clone()),
            dashboard_service: DashboardService::new(backend.clone()),
            views: ViewRegistry::new(),
            chat: Arc::new(ChatSession::new(AssistantProxy::new(assistant))),
            relay: ChatRelay::new(backend),
            sessions,
        }
    }
}
