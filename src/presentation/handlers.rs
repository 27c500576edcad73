// HTTP request handlers
use crate::application::assistant_proxy::SubmitOutcome;
use crate::application::auth_service::AuthError;
use crate::application::chat_relay::{RelayReply, RelayRequest, RELAY_UNAVAILABLE};
use crate::application::dashboard_service::RenderedPage;
use crate::application::session_store::{guard, Guard};
use crate::application::view_registry::{MountTicket, ViewId};
use crate::domain::chat::Transcript;
use crate::domain::session::{ActiveSession, LoginRequest, KNOWN_BRANDS};
use crate::domain::telemetry::Subsystem;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/login";

#[derive(Deserialize)]
pub struct ChatSubmission {
    #[serde(default)]
    pub question: String,
}

#[derive(Serialize)]
struct ChatView {
    transcript: Transcript,
    pending: bool,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Guarded views bounce to the login view when no complete session exists
fn require_session(state: &AppState) -> Result<ActiveSession, Response> {
    match guard(state.sessions.as_ref()) {
        Guard::Proceed(session) => Ok(session),
        Guard::RedirectToLogin => Err(Redirect::to(LOGIN_PATH).into_response()),
    }
}

/// Hands the page to the registry; a load overtaken by another mount is refused
fn render(state: &AppState, ticket: &MountTicket, page: RenderedPage) -> Response {
    if state.views.apply(ticket, page.clone()) {
        Json(page).into_response()
    } else {
        tracing::debug!(view = ?ticket.view, "discarding stale page load");
        error_body(StatusCode::CONFLICT, "view was replaced before it finished loading")
    }
}

fn chat_view(state: &AppState) -> ChatView {
    ChatView {
        transcript: state.chat.transcript(),
        pending: state.chat.is_pending(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Brands offered by the login form
pub async fn login_form() -> impl IntoResponse {
    Json(json!({ "brands": KNOWN_BRANDS }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match state.auth_service.login(&request).await {
        Ok(session) => {
            state.chat.reset();
            Json(json!({ "brand": session.brand })).into_response()
        }
        Err(e) => {
            let status = match e {
                AuthError::MissingFields | AuthError::UnknownBrand(_) => StatusCode::BAD_REQUEST,
                AuthError::Rejected => StatusCode::UNAUTHORIZED,
                AuthError::Unreachable => StatusCode::BAD_GATEWAY,
                AuthError::NotConfigured | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_body(status, e.to_string())
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Response {
    state.views.unmount_all();
    state.chat.reset();

    match state.auth_service.logout() {
        Ok(()) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "logout failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Overview: fleet summary plus the cross-brand ranking
pub async fn overview_page(State(state): State<Arc<AppState>>) -> Response {
    let session = match require_session(&state) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    let ticket = state.views.mount(ViewId::Overview);
    let page = state
        .dashboard_service
        .load_overview(&session, ticket.cancellation())
        .await;

    render(&state, &ticket, RenderedPage::Overview(page))
}

/// One of the engine, battery or brakes insight pages
pub async fn subsystem_page(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let session = match require_session(&state) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let subsystem: Subsystem = match name.parse() {
        Ok(subsystem) => subsystem,
        Err(e) => return error_body(StatusCode::NOT_FOUND, format!("{}", e)),
    };

    let ticket = state.views.mount(ViewId::Subsystem(subsystem));
    let page = state
        .dashboard_service
        .load_subsystem(&session, subsystem, ticket.cancellation())
        .await;

    render(&state, &ticket, RenderedPage::Subsystem(page))
}

/// Last page applied by the mounted view
pub async fn current_view(State(state): State<Arc<AppState>>) -> Response {
    if let Err(redirect) = require_session(&state) {
        return redirect;
    }

    match state.views.current() {
        Some((view, page)) => Json(json!({ "view": view, "page": page })).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn chat_transcript(State(state): State<Arc<AppState>>) -> Response {
    if let Err(redirect) = require_session(&state) {
        return redirect;
    }
    Json(chat_view(&state)).into_response()
}

pub async fn chat_submit(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ChatSubmission>,
) -> Response {
    let session = match require_session(&state) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    // Detached so a client disconnect cannot drop the pending assistant turn
    let chat = state.chat.clone();
    let submitted =
        tokio::spawn(async move { chat.submit(&submission.question, &session).await }).await;

    match submitted {
        Ok(SubmitOutcome::Busy) => (StatusCode::CONFLICT, Json(chat_view(&state))).into_response(),
        Ok(SubmitOutcome::Ignored | SubmitOutcome::Answered(_) | SubmitOutcome::Discarded) => {
            Json(chat_view(&state)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "chat submission task failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "chat submission failed")
        }
    }
}

/// Same-origin relay used by the chat widget in relay mode
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => {
            tracing::error!(error = %e, "unreadable chat relay request");
            return relay_failure(RELAY_UNAVAILABLE);
        }
    };

    match state.relay.relay(&request).await {
        RelayReply::Forwarded(body) => Json(body).into_response(),
        RelayReply::Failed(message) => relay_failure(message),
    }
}

fn relay_failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "answer": message })),
    )
        .into_response()
}
