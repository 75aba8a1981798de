//! Collection view state machine.
//!
//! Owns the canonical collection for one console screen: the last
//! server-confirmed page of entities, the server total, the active view
//! parameters, and the fetch status. All mutation of that state happens
//! here — presentation and the mutation coordinator go through `apply`,
//! `reload`, and `refresh`.
//!
//! Fetches are tagged with a monotonically increasing sequence number; a
//! resolution whose tag is no longer the latest is discarded, success or
//! failure, so a slow early request can never overwrite a newer one.

use log::{debug, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::collection::projector::project;
use crate::error::{Result, TallyLinkError};
use crate::models::entity::CollectionItem;
use crate::models::page::total_pages;
use crate::models::params::{ListQuery, ViewParams, ViewParamsPatch};
use crate::models::status::FetchPhase;
use crate::resource::RemoteCollection;

/// Whether the backend pages this resource or ships the whole collection.
///
/// Under `Server` the canonical collection is already a single page, so the
/// projector must not slice it again; under `Client` the projector owns
/// search, sort, and paging entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    #[default]
    Server,
    Client,
}

/// Read-only copy of the state machine's current state.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    /// Server-side total across all pages of the current query context.
    /// Distinct from `items.len()` — do not conflate the two when computing
    /// shares or percentages.
    pub total_items: u64,
    pub params: ViewParams,
    pub phase: FetchPhase,
    pub last_error: Option<String>,
}

struct ViewInner<T> {
    items: Vec<T>,
    total_items: u64,
    total_known: bool,
    params: ViewParams,
    phase: FetchPhase,
    last_error: Option<String>,
}

enum Applied {
    Done,
    /// The requested page fell off the end of the collection; fetch again
    /// at the clamped page.
    Refetch,
}

/// State machine for one managed collection.
pub struct CollectionView<T: CollectionItem> {
    client: Arc<dyn RemoteCollection<T>>,
    paging: PagingMode,
    seq: AtomicU64,
    closed: AtomicBool,
    inner: Mutex<ViewInner<T>>,
}

impl<T: CollectionItem> CollectionView<T> {
    pub fn new(client: Arc<dyn RemoteCollection<T>>) -> Self {
        Self::with_params(client, ViewParams::default())
    }

    pub fn with_params(client: Arc<dyn RemoteCollection<T>>, params: ViewParams) -> Self {
        Self {
            client,
            paging: PagingMode::Server,
            seq: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            inner: Mutex::new(ViewInner {
                items: Vec::new(),
                total_items: 0,
                total_known: false,
                params,
                phase: FetchPhase::Idle,
                last_error: None,
            }),
        }
    }

    /// Switch to client-side paging for resources whose list endpoint ships
    /// the whole collection.
    pub fn client_paged(mut self) -> Self {
        self.paging = PagingMode::Client;
        self
    }

    /// Merge a partial parameter update and refetch when anything
    /// query-relevant changed.
    ///
    /// Search, sort, and filter changes rewind to page 1; page navigation
    /// does not. A `page_size` change that strands the current page beyond
    /// the last known total clamps it to the last valid page.
    pub async fn apply(&self, patch: ViewParamsPatch) -> Result<()> {
        let needs_fetch = {
            let mut inner = self.inner.lock().await;
            let changed = inner.params.merge(patch);
            if changed && inner.total_known {
                let pages = total_pages(inner.total_items, inner.params.page_size);
                if inner.params.page > pages {
                    debug!(
                        "[COLLECTION] {} page {} beyond {} pages, clamping",
                        T::RESOURCE,
                        inner.params.page,
                        pages
                    );
                    inner.params.page = pages;
                }
            }
            changed
        };
        if needs_fetch {
            self.reload().await
        } else {
            Ok(())
        }
    }

    /// Sort-header click: toggle direction on the current key, start a new
    /// key ascending, rewind to page 1, refetch.
    pub async fn toggle_sort(&self, key: &str) -> Result<()> {
        {
            let mut inner = self.inner.lock().await;
            inner.params.toggle_sort(key);
        }
        self.reload().await
    }

    /// Shorthand for a search-term change.
    pub async fn search(&self, term: impl Into<String>) -> Result<()> {
        self.apply(ViewParamsPatch::default().search(term)).await
    }

    /// Shorthand for page navigation.
    pub async fn set_page(&self, page: u32) -> Result<()> {
        self.apply(ViewParamsPatch::default().page(page)).await
    }

    /// Fetch with the current parameters.
    ///
    /// On success the canonical collection and total are replaced and the
    /// phase becomes `Loaded`. On failure the previous items are preserved
    /// and the phase becomes `Error` with the message — the table never
    /// blanks on a transient error. Superseded and post-close resolutions
    /// are discarded silently.
    pub async fn reload(&self) -> Result<()> {
        match self.fetch_once().await {
            Ok(Applied::Refetch) => match self.fetch_once().await {
                Ok(_) => Ok(()),
                Err(e) if e.is_internal() => Ok(()),
                Err(e) => Err(e),
            },
            Ok(Applied::Done) => Ok(()),
            Err(e) if e.is_internal() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Re-issue the fetch with identical parameters; used after mutations
    /// and manual refresh actions.
    pub async fn refresh(&self) -> Result<()> {
        self.reload().await
    }

    /// Tear the view down: any in-flight fetch's eventual resolution is
    /// ignored and no further state mutation happens.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Read-only copy of the current state.
    pub async fn snapshot(&self) -> CollectionSnapshot<T> {
        let inner = self.inner.lock().await;
        CollectionSnapshot {
            items: inner.items.clone(),
            total_items: inner.total_items,
            params: inner.params.clone(),
            phase: inner.phase,
            last_error: inner.last_error.clone(),
        }
    }

    /// The currently visible slice: canonical items run through the
    /// projector. Under server-side paging the page slice is suppressed
    /// (the collection is already one page).
    pub async fn visible(&self) -> Vec<T> {
        let inner = self.inner.lock().await;
        let params = match self.paging {
            PagingMode::Server => inner.params.first_page(),
            PagingMode::Client => inner.params.clone(),
        };
        project(&inner.items, &params)
    }

    async fn fetch_once(&self) -> Result<Applied> {
        if self.is_closed() {
            return Err(TallyLinkError::ViewClosed);
        }

        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = {
            let mut inner = self.inner.lock().await;
            if inner.total_known {
                // Effective page is always within the last known page space.
                let pages = total_pages(inner.total_items, inner.params.page_size);
                if inner.params.page > pages {
                    inner.params.page = pages;
                }
            }
            inner.phase = FetchPhase::Loading;
            ListQuery::from_params(&inner.params, inner.params.page)
        };

        debug!(
            "[COLLECTION] fetch #{ticket} {} page={} pageSize={}",
            T::RESOURCE,
            query.page,
            query.page_size
        );
        let outcome = self.client.list(&query).await;

        let mut inner = self.inner.lock().await;
        if self.is_closed() {
            debug!("[COLLECTION] fetch #{ticket} resolved after close, discarded");
            return Err(TallyLinkError::ViewClosed);
        }
        if self.seq.load(Ordering::SeqCst) != ticket {
            debug!("[COLLECTION] fetch #{ticket} superseded, result discarded");
            return Err(TallyLinkError::StaleResponse);
        }

        match outcome {
            Ok(result) => {
                inner.items = dedup_by_id(result.items);
                inner.total_items = result.total_items;
                inner.total_known = true;
                inner.phase = FetchPhase::Loaded;
                inner.last_error = None;

                let pages = total_pages(inner.total_items, inner.params.page_size);
                if inner.params.page > pages && inner.items.is_empty() {
                    // The collection shrank under us (e.g. deletions on the
                    // last page). Clamp and fetch the last valid page.
                    debug!(
                        "[COLLECTION] {} page {} now out of range, refetching page {}",
                        T::RESOURCE,
                        inner.params.page,
                        pages
                    );
                    inner.params.page = pages;
                    return Ok(Applied::Refetch);
                }
                Ok(Applied::Done)
            }
            Err(error) => {
                warn!("[COLLECTION] fetch #{ticket} {} failed: {error}", T::RESOURCE);
                inner.phase = FetchPhase::Error;
                inner.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }
}

/// Keep at most one entity per identifier, first occurrence wins.
fn dedup_by_id<T: CollectionItem>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.id().clone()) {
            out.push(item);
        } else {
            warn!(
                "[COLLECTION] duplicate {} id {} dropped",
                T::RESOURCE,
                item.id()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::EntityId;
    use crate::models::records::Cashier;

    fn cashier(id: i64) -> Cashier {
        Cashier {
            id: EntityId::from(id),
            name: format!("c{id}"),
            code: format!("C-{id}"),
            active: true,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let items = vec![cashier(1), cashier(2), cashier(1), cashier(3)];
        let deduped = dedup_by_id(items);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].id, EntityId::from(1));
        assert_eq!(deduped[1].id, EntityId::from(2));
        assert_eq!(deduped[2].id, EntityId::from(3));
    }
}
