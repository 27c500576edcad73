// Auth service - Login creates the session, logout clears it
use crate::application::session_store::SessionStore;
use crate::application::telemetry_client::ClientError;
use crate::domain::session::{is_known_brand, ActiveSession, LoginRequest, LoginResponse, Session};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError>;
}

/// Login failures, worded for display on the login form
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Please fill all fields and select a brand")]
    MissingFields,

    #[error("Unknown brand: {0}")]
    UnknownBrand(String),

    #[error("Backend URL not configured")]
    NotConfigured,

    #[error("Invalid email, password or brand")]
    Rejected,

    #[error("Backend not reachable")]
    Unreachable,

    #[error("Failed to store session: {0}")]
    Store(String),
}

#[derive(Clone)]
pub struct AuthService {
    client: Arc<dyn AuthClient>,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(client: Arc<dyn AuthClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<ActiveSession, AuthError> {
        if !request.is_complete() {
            return Err(AuthError::MissingFields);
        }
        if !is_known_brand(&request.brand) {
            return Err(AuthError::UnknownBrand(request.brand.clone()));
        }

        let response = self.client.login(request).await.map_err(|e| {
            tracing::warn!(brand = %request.brand, error = %e, "login failed");
            match e {
                ClientError::Config(_) => AuthError::NotConfigured,
                ClientError::Status { .. } => AuthError::Rejected,
                _ => AuthError::Unreachable,
            }
        })?;

        let session = Session::new(response.access_token, response.brand);
        let Some(active) = session.activate() else {
            tracing::warn!("login response carried a blank token or brand");
            return Err(AuthError::Rejected);
        };
        self.store
            .write_session(&session)
            .map_err(|e| AuthError::Store(e.to_string()))?;

        tracing::info!(brand = %active.brand, "logged in");
        Ok(active)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store
            .clear_session()
            .map_err(|e| AuthError::Store(e.to_string()))?;
        tracing::info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session_store::InMemorySessionStore;

    struct FixedAuth(Result<LoginResponse, ClientError>);

    #[async_trait]
    impl AuthClient for FixedAuth {
        async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, ClientError> {
            self.0.clone()
        }
    }

    fn service(result: Result<LoginResponse, ClientError>) -> (AuthService, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::default());
        (AuthService::new(Arc::new(FixedAuth(result)), store.clone()), store)
    }

    fn request(brand: &str) -> LoginRequest {
        LoginRequest {
            email: "user1@example.com".to_string(),
            password: "password123".to_string(),
            brand: brand.to_string(),
        }
    }

    fn granted() -> Result<LoginResponse, ClientError> {
        Ok(LoginResponse {
            access_token: "jwt".to_string(),
            brand: "audi".to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_writes_session() {
        let (auth, store) = service(granted());

        let session = auth.login(&request("audi")).await.unwrap();

        assert_eq!(session.token, "jwt");
        assert_eq!(store.read_session(), Session::new("jwt", "audi"));
    }

    #[tokio::test]
    async fn test_incomplete_form_is_rejected_before_network() {
        let (auth, store) = service(granted());
        let mut incomplete = request("audi");
        incomplete.password = " ".to_string();

        assert_eq!(auth.login(&incomplete).await, Err(AuthError::MissingFields));
        assert_eq!(store.read_session(), Session::default());
    }

    #[tokio::test]
    async fn test_unknown_brand_is_rejected() {
        let (auth, _) = service(granted());
        assert_eq!(
            auth.login(&request("tesla")).await,
            Err(AuthError::UnknownBrand("tesla".to_string()))
        );
    }

    #[tokio::test]
    async fn test_backend_errors_map_to_form_messages() {
        let cases = [
            (ClientError::Config("unset".to_string()), AuthError::NotConfigured),
            (
                ClientError::Status {
                    status: 401,
                    url: "/auth/login".to_string(),
                },
                AuthError::Rejected,
            ),
            (ClientError::Transport("refused".to_string()), AuthError::Unreachable),
        ];

        for (error, expected) in cases {
            let (auth, store) = service(Err(error));
            assert_eq!(auth.login(&request("audi")).await, Err(expected));
            assert_eq!(store.read_session(), Session::default());
        }
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected_without_storing() {
        let (auth, store) = service(Ok(LoginResponse {
            access_token: " ".to_string(),
            brand: "audi".to_string(),
        }));

        assert_eq!(auth.login(&request("audi")).await, Err(AuthError::Rejected));
        assert_eq!(store.read_session(), Session::default());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (auth, store) = service(granted());
        auth.login(&request("audi")).await.unwrap();

        auth.logout().unwrap();

        assert_eq!(store.read_session(), Session::default());
    }
}
