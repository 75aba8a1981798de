//! Main console client with builder pattern.
//!
//! Provides the entry point for talking to the Tally admin console API:
//! login plus typed per-resource collection handles.

use log::debug;
use std::time::{Duration, Instant};

use crate::auth::{ArcTokenSource, AuthProvider, ResolvedAuth};
use crate::error::{Result, TallyLinkError};
use crate::models::entity::CollectionItem;
use crate::models::login::{LoginRequest, LoginResponse};
use crate::resource::{error_from_response, RestCollection};
use crate::timeouts::TallyLinkTimeouts;

/// Main console API client.
///
/// Use [`TallyLinkClient::builder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use tally_link::{TallyLinkClient, models::Product};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TallyLinkClient::builder()
///     .base_url("http://localhost:3000/api")
///     .bearer_token("eyJhbGc...")
///     .build()?;
///
/// let products = client.collection::<Product>();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TallyLinkClient {
    base_url: String,
    http: reqwest::Client,
    auth: ResolvedAuth,
    timeouts: TallyLinkTimeouts,
}

impl TallyLinkClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> TallyLinkClientBuilder {
        TallyLinkClientBuilder::new()
    }

    /// Typed handle for one REST resource, e.g.
    /// `client.collection::<Product>()` for `GET {base}/products`.
    pub fn collection<T: CollectionItem>(&self) -> RestCollection<T> {
        RestCollection::new(self.base_url.clone(), self.http.clone(), self.auth.clone())
    }

    /// Authenticate with username and password.
    ///
    /// Returns the bearer token and user identity; the caller decides where
    /// to persist them (see [`crate::session::SessionStore`]).
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        debug!("[LOGIN] authenticating user '{username}' at {url}");

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let started = Instant::now();
        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        debug!(
            "[LOGIN] response received in {:?}, status={status}",
            started.elapsed()
        );

        if !status.is_success() {
            let error = error_from_response(response).await;
            return Err(TallyLinkError::Authentication(format!(
                "login failed: {error}"
            )));
        }

        Ok(response.json::<LoginResponse>().await?)
    }

    /// The configured API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured timeouts.
    pub fn timeouts(&self) -> &TallyLinkTimeouts {
        &self.timeouts
    }
}

/// Builder for [`TallyLinkClient`] instances.
pub struct TallyLinkClientBuilder {
    base_url: Option<String>,
    auth: ResolvedAuth,
    timeouts: TallyLinkTimeouts,
}

impl TallyLinkClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            auth: ResolvedAuth::default(),
            timeouts: TallyLinkTimeouts::default(),
        }
    }

    /// Set the API base URL (required).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set bearer-token authentication.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = ResolvedAuth::from(AuthProvider::bearer_token(token));
        self
    }

    /// Set static authentication credentials directly.
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = ResolvedAuth::from(auth);
        self
    }

    /// Set a dynamic token source, consulted per request and refreshed once
    /// after a 401.
    pub fn token_source(mut self, source: ArcTokenSource) -> Self {
        self.auth = ResolvedAuth::from(source);
        self
    }

    /// Shorthand for overriding just the receive timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.receive_timeout = timeout;
        self
    }

    /// Set the full timeout configuration.
    pub fn timeouts(mut self, timeouts: TallyLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TallyLinkClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| TallyLinkError::Configuration("base_url is required".into()))?
            .trim_end_matches('/')
            .to_string();

        // Keep-alive pooling: one console screen issues many small requests.
        let http = reqwest::Client::builder()
            .timeout(self.timeouts.receive_timeout)
            .connect_timeout(self.timeouts.connection_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| TallyLinkError::Configuration(e.to_string()))?;

        Ok(TallyLinkClient {
            base_url,
            http,
            auth: self.auth,
            timeouts: self.timeouts,
        })
    }
}
