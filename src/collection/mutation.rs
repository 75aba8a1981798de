//! Mutation coordination.
//!
//! Wraps create/update/delete calls with in-flight tracking, error
//! surfacing, and a post-mutation `refresh()` of the paired collection view.
//! Reconciliation is deliberately refresh-after-mutation, not optimistic
//! merge: the server stays the single source of truth.
//!
//! Concurrent mutations on different identifiers proceed in parallel;
//! a second mutation on an identifier that is still submitting is rejected
//! immediately with [`TallyLinkError::MutationInFlight`] — no queueing, no
//! network call.

use log::{debug, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::collection::view::CollectionView;
use crate::error::{Result, TallyLinkError};
use crate::models::entity::{CollectionItem, EntityId};
use crate::models::status::{MutationKind, MutationRecord};
use crate::notify::ArcNotifier;
use crate::resource::RemoteCollection;

/// Record index. Targeted mutations key by entity id; creates — which may
/// run in parallel — each get their own token so one create's completion
/// never touches another's record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RecordKey {
    Create(u64),
    Target(EntityId),
}

/// Coordinates mutations for one collection screen.
pub struct MutationCoordinator<T: CollectionItem> {
    client: Arc<dyn RemoteCollection<T>>,
    view: Arc<CollectionView<T>>,
    notify: ArcNotifier,
    in_flight: Mutex<HashSet<EntityId>>,
    records: Mutex<HashMap<RecordKey, MutationRecord>>,
    create_seq: AtomicU64,
}

impl<T: CollectionItem> MutationCoordinator<T> {
    pub fn new(
        client: Arc<dyn RemoteCollection<T>>,
        view: Arc<CollectionView<T>>,
        notify: ArcNotifier,
    ) -> Self {
        Self {
            client,
            view,
            notify,
            in_flight: Mutex::new(HashSet::new()),
            records: Mutex::new(HashMap::new()),
            create_seq: AtomicU64::new(0),
        }
    }

    /// Create an entity from a payload of writable fields.
    ///
    /// Creates carry no identifier, so they are never serialized against
    /// each other; each one tracks its own record.
    pub async fn create(&self, payload: impl Serialize + Send) -> Result<T> {
        let payload = serde_json::to_value(payload)?;
        let key = RecordKey::Create(self.create_seq.fetch_add(1, Ordering::SeqCst));
        self.lock_records()
            .insert(key.clone(), MutationRecord::started(MutationKind::Create, None));
        debug!("[MUTATION] create {}", T::RESOURCE);

        match self.client.create(payload).await {
            Ok(entity) => {
                self.finish_ok(&key, None, &format!("{} created", T::LABEL)).await;
                Ok(entity)
            }
            Err(error) => {
                self.finish_err(&key, None, &error);
                Err(error)
            }
        }
    }

    /// Update an entity's writable fields.
    pub async fn update(&self, id: &EntityId, payload: impl Serialize + Send) -> Result<T> {
        let payload = serde_json::to_value(payload)?;
        let key = self.begin(MutationKind::Update, id)?;
        debug!("[MUTATION] update {} {id}", T::RESOURCE);

        match self.client.update(id, payload).await {
            Ok(entity) => {
                self.finish_ok(&key, Some(id), &format!("{} saved", T::LABEL)).await;
                Ok(entity)
            }
            Err(error) => {
                self.finish_err(&key, Some(id), &error);
                Err(error)
            }
        }
    }

    /// Delete an entity.
    ///
    /// Any "are you sure" confirmation happens upstream, before this call.
    pub async fn remove(&self, id: &EntityId) -> Result<()> {
        let key = self.begin(MutationKind::Delete, id)?;
        debug!("[MUTATION] delete {} {id}", T::RESOURCE);

        match self.client.remove(id).await {
            Ok(()) => {
                self.finish_ok(&key, Some(id), &format!("{} deleted", T::LABEL)).await;
                Ok(())
            }
            Err(error) => {
                self.finish_err(&key, Some(id), &error);
                Err(error)
            }
        }
    }

    /// The mutation record for an entity, if one is in flight or failed and
    /// not yet acknowledged.
    pub fn record_for(&self, id: &EntityId) -> Option<MutationRecord> {
        self.lock_records().get(&RecordKey::Target(id.clone())).cloned()
    }

    /// The record of the most recent create still in flight or failed.
    pub fn create_record(&self) -> Option<MutationRecord> {
        self.lock_records()
            .iter()
            .filter_map(|(key, record)| match key {
                RecordKey::Create(token) => Some((*token, record)),
                RecordKey::Target(_) => None,
            })
            .max_by_key(|(token, _)| *token)
            .map(|(_, record)| record.clone())
    }

    /// `true` while a mutation targeting this entity is submitting.
    pub fn is_submitting(&self, id: &EntityId) -> bool {
        self.lock_in_flight().contains(id)
    }

    /// Drop settled records after the UI has shown their errors. With a
    /// target the entity's record is dropped; with `None` every settled
    /// create record is dropped (still-submitting creates keep theirs).
    pub fn acknowledge(&self, target: Option<&EntityId>) {
        let mut records = self.lock_records();
        match target {
            Some(id) => {
                records.remove(&RecordKey::Target(id.clone()));
            }
            None => {
                records.retain(|key, record| {
                    !matches!(key, RecordKey::Create(_)) || record.submitting
                });
            }
        }
    }

    /// Reserve the target and open its record; rejects a busy identifier
    /// synchronously, before any network traffic.
    fn begin(&self, kind: MutationKind, id: &EntityId) -> Result<RecordKey> {
        {
            let mut in_flight = self.lock_in_flight();
            if !in_flight.insert(id.clone()) {
                debug!(
                    "[MUTATION] {} {id} rejected, a mutation is already in flight",
                    T::RESOURCE
                );
                return Err(TallyLinkError::MutationInFlight(id.clone()));
            }
        }
        let key = RecordKey::Target(id.clone());
        self.lock_records()
            .insert(key.clone(), MutationRecord::started(kind, Some(id.clone())));
        Ok(key)
    }

    async fn finish_ok(&self, key: &RecordKey, target: Option<&EntityId>, message: &str) {
        if let Some(id) = target {
            self.lock_in_flight().remove(id);
        }
        self.lock_records().remove(key);
        self.notify.success(message);

        // Reconcile by refetching; a refresh failure lands in the view's
        // fetch status, not in the mutation result.
        if let Err(error) = self.view.refresh().await {
            warn!("[MUTATION] post-mutation refresh failed: {error}");
        }
    }

    fn finish_err(&self, key: &RecordKey, target: Option<&EntityId>, error: &TallyLinkError) {
        if let Some(id) = target {
            self.lock_in_flight().remove(id);
        }
        if let Some(record) = self.lock_records().get_mut(key) {
            record.submitting = false;
            record.error = Some(error.to_string());
        }
        self.notify.error(&error.to_string());
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashSet<EntityId>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<RecordKey, MutationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
