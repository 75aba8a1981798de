//! Authentication provider for the console API.
//!
//! Handles bearer tokens and HTTP Basic Auth, attaching the appropriate
//! Authorization header to outgoing requests. A [`TokenSource`] supplies
//! credentials lazily and is consulted exactly once per request after a 401,
//! matching the console's refresh-and-retry-once contract.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

use crate::error::Result;

/// Authentication credentials attached to each request.
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password).
    BasicAuth(String, String),

    /// Bearer token issued by the login endpoint.
    BearerToken(String),

    /// No authentication.
    None,
}

impl AuthProvider {
    /// Create HTTP Basic Auth credentials (RFC 7617).
    pub fn basic_auth(username: String, password: String) -> Self {
        Self::BasicAuth(username, password)
    }

    /// Create bearer-token authentication.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// No authentication.
    pub fn none() -> Self {
        Self::None
    }

    /// Attach the Authorization header for this credential kind:
    /// - BasicAuth: `Authorization: Basic <base64(username:password)>`
    /// - BearerToken: `Authorization: Bearer <token>`
    /// - None: no header
    pub fn apply_to_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        match self {
            Self::BasicAuth(username, password) => {
                let credentials = format!("{username}:{password}");
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Ok(request.header("Authorization", format!("Basic {encoded}")))
            }
            Self::BearerToken(token) => Ok(request.bearer_auth(token)),
            Self::None => Ok(request),
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Async credential source consulted before requests and refreshed after a 401.
///
/// Implement this to bridge token storage or an OAuth-style refresh flow into
/// the client. `refresh` is called at most once per request; if the retried
/// request still fails, the failure propagates.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    /// Return the current credentials.
    async fn current(&self) -> Result<AuthProvider>;

    /// Obtain fresh credentials after the server rejected the current ones.
    async fn refresh(&self) -> Result<AuthProvider>;
}

/// A boxed, reference-counted [`TokenSource`].
pub type ArcTokenSource = Arc<dyn TokenSource>;

/// Resolves the effective [`AuthProvider`] for each request.
///
/// Holds either static credentials or a dynamic source. Static credentials
/// cannot refresh; a 401 with static credentials propagates immediately.
#[derive(Clone)]
pub enum ResolvedAuth {
    /// Static credentials set at construction time.
    Static(AuthProvider),
    /// Dynamic source consulted per request.
    Dynamic(ArcTokenSource),
}

impl ResolvedAuth {
    /// Obtain effective credentials, calling the dynamic source if present.
    pub async fn resolve(&self) -> Result<AuthProvider> {
        match self {
            Self::Static(provider) => Ok(provider.clone()),
            Self::Dynamic(source) => source.current().await,
        }
    }

    /// Ask the dynamic source for fresh credentials after a 401.
    /// `None` means there is nothing to refresh (static credentials).
    pub async fn refreshed(&self) -> Result<Option<AuthProvider>> {
        match self {
            Self::Static(_) => Ok(None),
            Self::Dynamic(source) => source.refresh().await.map(Some),
        }
    }

    /// `true` when no credentials of either kind are configured.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Static(AuthProvider::None))
    }
}

impl std::fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(provider) => write!(f, "ResolvedAuth::Static({provider:?})"),
            Self::Dynamic(_) => write!(f, "ResolvedAuth::Dynamic(<source>)"),
        }
    }
}

impl Default for ResolvedAuth {
    fn default() -> Self {
        Self::Static(AuthProvider::None)
    }
}

impl From<AuthProvider> for ResolvedAuth {
    fn from(provider: AuthProvider) -> Self {
        Self::Static(provider)
    }
}

impl From<ArcTokenSource> for ResolvedAuth {
    fn from(source: ArcTokenSource) -> Self {
        Self::Dynamic(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_creation() {
        let basic = AuthProvider::basic_auth("alice".to_string(), "secret".to_string());
        assert!(basic.is_authenticated());

        let bearer = AuthProvider::bearer_token("test_token");
        assert!(bearer.is_authenticated());

        let none = AuthProvider::none();
        assert!(!none.is_authenticated());
    }

    #[test]
    fn test_basic_auth_base64_format() {
        let credentials = format!("{}:{}", "alice", "secret123");
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        assert_eq!(encoded, "YWxpY2U6c2VjcmV0MTIz");
    }

    #[test]
    fn test_apply_to_request_does_not_error() {
        let auth = AuthProvider::bearer_token("abc");
        let client = reqwest::Client::new();
        let request = client.get("http://localhost:8080");
        assert!(auth.apply_to_request(request).is_ok());
    }

    #[tokio::test]
    async fn test_static_auth_has_nothing_to_refresh() {
        let resolved = ResolvedAuth::from(AuthProvider::bearer_token("abc"));
        assert!(resolved.refreshed().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dynamic_auth_refreshes() {
        struct Rotating;

        #[async_trait]
        impl TokenSource for Rotating {
            async fn current(&self) -> Result<AuthProvider> {
                Ok(AuthProvider::bearer_token("old"))
            }
            async fn refresh(&self) -> Result<AuthProvider> {
                Ok(AuthProvider::bearer_token("new"))
            }
        }

        let resolved = ResolvedAuth::from(Arc::new(Rotating) as ArcTokenSource);
        match resolved.refreshed().await.unwrap() {
            Some(AuthProvider::BearerToken(token)) => assert_eq!(token, "new"),
            other => panic!("expected refreshed bearer token, got {other:?}"),
        }
    }
}
