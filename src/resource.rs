//! Typed per-resource HTTP access.
//!
//! [`RemoteCollection`] is the contract the collection state machine and the
//! mutation coordinator depend on; [`RestCollection`] is its HTTP
//! implementation. The transport never retries silently — the single
//! exception is the documented refresh-and-retry-once path after a 401.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Instant;

use crate::auth::ResolvedAuth;
use crate::error::{Result, TallyLinkError};
use crate::models::entity::{CollectionItem, EntityId};
use crate::models::page::ListResult;
use crate::models::params::ListQuery;
use crate::normalize;

/// Remote CRUD contract for one entity type.
#[async_trait]
pub trait RemoteCollection<T: CollectionItem>: Send + Sync {
    /// Fetch one page matching the query.
    async fn list(&self, query: &ListQuery) -> Result<ListResult<T>>;

    /// Fetch a single entity by id.
    async fn get(&self, id: &EntityId) -> Result<T>;

    /// Create an entity from a plain payload of writable fields.
    async fn create(&self, payload: Value) -> Result<T>;

    /// Replace an entity's writable fields.
    async fn update(&self, id: &EntityId, payload: Value) -> Result<T>;

    /// Delete an entity. Confirmation is the caller's responsibility.
    async fn remove(&self, id: &EntityId) -> Result<()>;
}

/// HTTP implementation of [`RemoteCollection`] for `T::RESOURCE`.
#[derive(Clone)]
pub struct RestCollection<T> {
    base_url: String,
    http: reqwest::Client,
    auth: ResolvedAuth,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CollectionItem> RestCollection<T> {
    pub(crate) fn new(base_url: String, http: reqwest::Client, auth: ResolvedAuth) -> Self {
        Self {
            base_url,
            http,
            auth,
            _marker: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, T::RESOURCE)
    }

    fn item_url(&self, id: &EntityId) -> String {
        format!("{}/{}/{}", self.base_url, T::RESOURCE, id)
    }

    /// Send a request with auth applied. On a 401, refresh the token source
    /// once and retry; a second 401 propagates as the final answer.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let auth = self.auth.resolve().await?;
        let response = auth.apply_to_request(build())?.send().await?;
        if response.status().as_u16() != 401 {
            return Ok(response);
        }

        let Some(fresh) = self.auth.refreshed().await? else {
            return Ok(response);
        };
        debug!("[LINK_HTTP] 401 received, retrying once with refreshed credentials");
        Ok(fresh.apply_to_request(build())?.send().await?)
    }

    /// Send, check the status, and parse the JSON body.
    async fn execute<F>(&self, build: F) -> Result<Value>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let response = self.send(build).await?;
        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<Value>()
                .await
                .map_err(|e| TallyLinkError::Decode(e.to_string()))?;
            Ok(body)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Send and check the status, ignoring any body.
    async fn execute_no_body<F>(&self, build: F) -> Result<()>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let response = self.send(build).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

#[async_trait]
impl<T: CollectionItem> RemoteCollection<T> for RestCollection<T> {
    async fn list(&self, query: &ListQuery) -> Result<ListResult<T>> {
        let url = self.collection_url();
        let pairs = query.to_pairs();
        let started = Instant::now();
        debug!(
            "[LINK_LIST] GET {} page={} pageSize={}",
            url, query.page, query.page_size
        );

        let body = self.execute(|| self.http.get(&url).query(&pairs)).await?;
        let result = normalize::decode_list(body)?;
        debug!(
            "[LINK_LIST] {} {} rows (total={}) in {:?}",
            T::RESOURCE,
            result.items.len(),
            result.total_items,
            started.elapsed()
        );
        Ok(result)
    }

    async fn get(&self, id: &EntityId) -> Result<T> {
        let url = self.item_url(id);
        debug!("[LINK_HTTP] GET {url}");
        let body = self.execute(|| self.http.get(&url)).await?;
        Ok(serde_json::from_value(normalize::unwrap_item(body))?)
    }

    async fn create(&self, payload: Value) -> Result<T> {
        let url = self.collection_url();
        debug!("[LINK_HTTP] POST {url}");
        let body = self
            .execute(|| self.http.post(&url).json(&payload))
            .await?;
        Ok(serde_json::from_value(normalize::unwrap_item(body))?)
    }

    async fn update(&self, id: &EntityId, payload: Value) -> Result<T> {
        let url = self.item_url(id);
        debug!("[LINK_HTTP] PUT {url}");
        let body = self.execute(|| self.http.put(&url).json(&payload)).await?;
        Ok(serde_json::from_value(normalize::unwrap_item(body))?)
    }

    async fn remove(&self, id: &EntityId) -> Result<()> {
        let url = self.item_url(id);
        debug!("[LINK_HTTP] DELETE {url}");
        self.execute_no_body(|| self.http.delete(&url)).await
    }
}

/// Convert a non-2xx response into a typed error with the message extracted
/// from the server envelope when present.
pub(crate) async fn error_from_response(response: reqwest::Response) -> TallyLinkError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let error = TallyLinkError::from_status_body(status, &body);
    warn!("[LINK_HTTP] server error: status={status} message=\"{error}\"");
    error
}
