// Router - Route table for the dashboard service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chat_submit, chat_transcript, current_view, health_check, login, login_form, logout,
    overview_page, relay_chat, subsystem_page,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .route("/dashboard", get(overview_page))
        .route("/dashboard/:subsystem", get(subsystem_page))
        .route("/view", get(current_view))
        .route("/chat", get(chat_transcript).post(chat_submit))
        .route("/api/chat", post(relay_chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::assistant_proxy::FALLBACK_ANSWER;
    use crate::application::chat_relay::RELAY_NOT_CONFIGURED;
    use crate::application::session_store::{InMemorySessionStore, SessionStore};
    use crate::domain::chat::GREETING;
    use crate::domain::session::Session;
    use crate::infrastructure::http_client::HttpTelemetryClient;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_is, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(base_url: Option<String>, session: Session) -> (Router, Arc<AppState>) {
        let backend = Arc::new(HttpTelemetryClient::new(base_url, Duration::from_secs(5)).unwrap());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(session));
        let state = Arc::new(AppState::new(sessions, backend.clone(), backend));
        (build_router(state.clone()), state)
    }

    fn logged_in() -> Session {
        Session::new("t0k", "kia")
    }

    async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (router, _) = app(None, Session::default());
        let response = send(router, get_request("/healthz")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guarded_views_redirect_to_login() {
        for uri in ["/dashboard", "/dashboard/engine", "/chat", "/view"] {
            let (router, _) = app(None, Session {
                token: Some("t0k".to_string()),
                brand: None,
            });
            let response = send(router, get_request(uri)).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(response.headers()[header::LOCATION], "/login");
        }
    }

    #[tokio::test]
    async fn test_unknown_subsystem_is_not_found() {
        let (router, _) = app(None, logged_in());
        let response = send(router, get_request("/dashboard/tyres")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_engine_page_from_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kia/engine/temp-performance"))
            .and(header_is("authorization", "Bearer t0k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"temp_band": "60-70", "avg_engine_performance_percent": 91.5}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/kia/engine/distribution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"label": "0-50", "value": 2},
                {"label": "50-100", "value": 8}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/kia/engine/risk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"engine_failure_imminent": 1, "fraction": 0.42}
            ])))
            .mount(&server)
            .await;

        let (router, state) = app(Some(server.uri()), logged_in());
        let response = send(router, get_request("/dashboard/engine")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["title"], "Engine Insights");
        assert_eq!(page["series"], json!([{"bucketLabel": "60-70", "value": 91.5}]));
        assert_eq!(page["distribution"][1], json!({"label": "50-100", "count": 8.0}));
        assert_eq!(page["risk"], json!({"label": "High Risk", "confidencePercent": 42}));
        assert_eq!(page["riskColor"], "#ef4444");
        assert_eq!(page["failures"], json!([]));

        assert!(state.views.current().is_some());
    }

    #[tokio::test]
    async fn test_overview_without_base_url_renders_notice() {
        let (router, _) = app(None, logged_in());
        let response = send(router, get_request("/dashboard")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["greeting"], "Hello Team KIA");
        assert_eq!(page["summary"], Value::Null);
        assert_eq!(page["ranking"], json!([]));
        assert_eq!(page["notice"], "API base URL not configured");
        assert_eq!(page["failures"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_login_validation_errors() {
        let (router, _) = app(None, Session::default());
        let response = send(
            router,
            post_json("/login", json!({"email": "a@b.c", "password": "", "brand": "kia"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Please fill all fields and select a brand"
        );
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "token_type": "bearer",
                "brand": "ford"
            })))
            .mount(&server)
            .await;

        let (router, state) = app(Some(server.uri()), Session::default());
        let response = send(
            router,
            post_json("/login", json!({"email": "a@b.c", "password": "pw", "brand": "ford"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.sessions.read_session(), Session::new("jwt", "ford"));
    }

    #[tokio::test]
    async fn test_rejected_login_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (router, state) = app(Some(server.uri()), Session::default());
        let response = send(
            router,
            post_json("/login", json!({"email": "a@b.c", "password": "bad", "brand": "ford"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.sessions.read_session(), Session::default());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_redirects() {
        let (router, state) = app(None, logged_in());
        let response = send(
            router,
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert_eq!(state.sessions.read_session(), Session::default());
    }

    #[tokio::test]
    async fn test_chat_round_trip_through_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/query"))
            .and(header_is("authorization", "Bearer t0k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "All good"})))
            .mount(&server)
            .await;

        let (router, _) = app(Some(server.uri()), logged_in());
        let response = send(router, post_json("/chat", json!({"question": "status?"}))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(
            view["transcript"],
            json!([
                {"role": "assistant", "content": GREETING},
                {"role": "user", "content": "status?"},
                {"role": "assistant", "content": "All good"}
            ])
        );
        assert_eq!(view["pending"], false);
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let (router, _) = app(None, logged_in());
        let response = send(router, post_json("/chat", json!({"question": "status?"}))).await;

        let view = json_body(response).await;
        assert_eq!(view["transcript"][2]["content"], FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_blank_chat_question_changes_nothing() {
        let (router, _) = app(None, logged_in());
        let response = send(router, post_json("/chat", json!({"question": "   "}))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["transcript"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_relay_forwards_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp/query"))
            .and(header_is("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Ranked 2nd"})))
            .mount(&server)
            .await;

        let (router, _) = app(Some(server.uri()), Session::default());
        let response = send(
            router,
            post_json("/api/chat", json!({"question": "rank?", "brand": "kia", "token": "abc"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"answer": "Ranked 2nd"}));
    }

    #[tokio::test]
    async fn test_relay_without_base_url() {
        let (router, _) = app(None, Session::default());
        let response = send(
            router,
            post_json("/api/chat", json!({"question": "rank?", "brand": "kia"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"answer": RELAY_NOT_CONFIGURED}));
    }

    #[tokio::test]
    async fn test_overtaken_page_load_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/kia/engine/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/kia/battery/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (router, _) = app(Some(server.uri()), logged_in());

        let engine = tokio::spawn(send(router.clone(), get_request("/dashboard/engine")));
        while server.received_requests().await.unwrap_or_default().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let battery = send(router.clone(), get_request("/dashboard/battery")).await;
        assert_eq!(battery.status(), StatusCode::OK);

        let engine = engine.await.unwrap();
        assert_eq!(engine.status(), StatusCode::CONFLICT);

        let current = send(router, get_request("/view")).await;
        assert_eq!(current.status(), StatusCode::OK);
        let current = json_body(current).await;
        assert_eq!(current["view"], json!({"subsystem": "battery"}));
        assert_eq!(current["page"]["title"], "Battery Insights");
    }
}
