// Session storage trait and the page guard built on it
use crate::domain::session::{ActiveSession, Session};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    fn read_session(&self) -> Session;

    fn write_session(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Removes both fields. The only logout path.
    fn clear_session(&self) -> Result<(), SessionStoreError>;
}

/// Outcome of the guard every protected view runs before doing any work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Proceed(ActiveSession),
    RedirectToLogin,
}

pub fn guard(store: &dyn SessionStore) -> Guard {
    match store.read_session().activate() {
        Some(session) => Guard::Proceed(session),
        None => {
            tracing::debug!("no active session, redirecting to login");
            Guard::RedirectToLogin
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Session>,
}

impl InMemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn read_session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
        Ok(())
    }
}
