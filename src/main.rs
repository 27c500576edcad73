// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::assistant_proxy::AssistantTransport;
use crate::application::session_store::{InMemorySessionStore, SessionStore};
use crate::infrastructure::config::{load_app_config, AssistantMode};
use crate::infrastructure::http_client::{HttpTelemetryClient, RelayAssistantClient};
use crate::infrastructure::session_file::FileSessionStore;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_app_config()?;

    // Backend client (infrastructure layer)
    let base_url = config.backend.base_url();
    if base_url.is_none() {
        tracing::warn!("backend.base_url is not set, backend requests will fail until it is configured");
    }
    let backend = Arc::new(HttpTelemetryClient::new(base_url, config.backend.timeout())?);

    let sessions: Arc<dyn SessionStore> = match &config.session.path {
        Some(path) => Arc::new(FileSessionStore::new(path.clone())),
        None => Arc::new(InMemorySessionStore::default()),
    };

    let assistant: Arc<dyn AssistantTransport> = match config.assistant.mode {
        AssistantMode::Direct => backend.clone(),
        AssistantMode::Relay => Arc::new(RelayAssistantClient::new(
            config.relay_url(),
            config.backend.timeout(),
        )?),
    };

    // Services and router (application and presentation layers)
    let state = Arc::new(AppState::new(sessions, backend, assistant));
    let router = build_router(state);

    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(%addr, mode = ?config.assistant.mode, "starting fleet-dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
