//! Session bootstrap seam.
//!
//! The console keeps the signed-in user in persistent browser storage. The
//! core only consumes "is a session present" and "who is it", so storage
//! itself stays behind [`SessionStore`] and tests never need a storage mock
//! beyond [`MemorySessionStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

use crate::auth::{AuthProvider, TokenSource};
use crate::error::{Result, TallyLinkError};
use crate::models::login::{LoginResponse, SessionUser};

/// Serialized session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.access_token,
            user: response.user,
        }
    }
}

/// Narrow interface over wherever the session is persisted.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.load().map(|session| session.user)
    }
}

/// In-process session store; the default outside a browser host.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.lock().clone()
    }

    fn save(&self, session: &Session) {
        *self.lock() = Some(session.clone());
    }

    fn clear(&self) {
        *self.lock() = None;
    }
}

/// [`TokenSource`] backed by a session store.
///
/// `refresh` re-reads the store, picking up a token some other component
/// (e.g. the login flow) has rotated in the meantime. With no session
/// present the refresh fails and the 401 propagates.
pub struct SessionTokenSource {
    store: Arc<dyn SessionStore>,
}

impl SessionTokenSource {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenSource for SessionTokenSource {
    async fn current(&self) -> Result<AuthProvider> {
        Ok(match self.store.load() {
            Some(session) => AuthProvider::bearer_token(session.token),
            None => AuthProvider::none(),
        })
    }

    async fn refresh(&self) -> Result<AuthProvider> {
        match self.store.load() {
            Some(session) => Ok(AuthProvider::bearer_token(session.token)),
            None => Err(TallyLinkError::Authentication(
                "no session available for token refresh".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::EntityId;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user: SessionUser {
                id: EntityId::from("u1"),
                username: "ana".to_string(),
                role: "admin".to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.save(&session("tok"));
        assert!(store.is_authenticated());
        assert_eq!(store.current_user().unwrap().username, "ana");

        store.clear();
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_token_source_tracks_store() {
        let store = Arc::new(MemorySessionStore::new());
        let source = SessionTokenSource::new(store.clone());

        assert!(!source.current().await.unwrap().is_authenticated());
        assert!(source.refresh().await.is_err());

        store.save(&session("tok"));
        match source.current().await.unwrap() {
            AuthProvider::BearerToken(token) => assert_eq!(token, "tok"),
            other => panic!("expected bearer token, got {other:?}"),
        }
    }
}
