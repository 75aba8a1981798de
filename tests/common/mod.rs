#![allow(dead_code)]
//! Shared test fixtures: a fully scripted in-process backend plus record
//! builders.
//!
//! Every call the code under test makes must be planned in advance; a
//! planned response can be gated on a oneshot so tests control exactly when
//! "the network" resolves.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

use tally_link::models::{Cashier, Product};
use tally_link::{
    CollectionItem, EntityId, ListQuery, ListResult, Notifier, RemoteCollection, Result,
    TallyLinkError,
};

pub struct Planned<R> {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<R>,
}

/// Scripted [`RemoteCollection`] implementation.
pub struct FakeBackend<T: CollectionItem> {
    lists: Mutex<VecDeque<Planned<ListResult<T>>>>,
    creates: Mutex<VecDeque<Planned<T>>>,
    updates: Mutex<VecDeque<Planned<T>>>,
    removes: Mutex<VecDeque<Planned<()>>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    seen_queries: Mutex<Vec<ListQuery>>,
}

impl<T: CollectionItem> FakeBackend<T> {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(VecDeque::new()),
            creates: Mutex::new(VecDeque::new()),
            updates: Mutex::new(VecDeque::new()),
            removes: Mutex::new(VecDeque::new()),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            seen_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn plan_list(&self, result: Result<ListResult<T>>) {
        lock(&self.lists).push_back(Planned { gate: None, result });
    }

    /// Plan a list response that resolves only once the returned sender fires.
    pub fn plan_list_gated(&self, result: Result<ListResult<T>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.lists).push_back(Planned {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn plan_create(&self, result: Result<T>) {
        lock(&self.creates).push_back(Planned { gate: None, result });
    }

    pub fn plan_create_gated(&self, result: Result<T>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.creates).push_back(Planned {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn plan_update(&self, result: Result<T>) {
        lock(&self.updates).push_back(Planned { gate: None, result });
    }

    pub fn plan_update_gated(&self, result: Result<T>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.updates).push_back(Planned {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn plan_remove(&self, result: Result<()>) {
        lock(&self.removes).push_back(Planned { gate: None, result });
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    pub fn seen_queries(&self) -> Vec<ListQuery> {
        lock(&self.seen_queries).clone()
    }

    pub fn last_query(&self) -> ListQuery {
        lock(&self.seen_queries)
            .last()
            .cloned()
            .expect("no list call recorded")
    }
}

async fn resolve<R>(planned: Planned<R>) -> Result<R> {
    if let Some(gate) = planned.gate {
        let _ = gate.await;
    }
    planned.result
}

#[async_trait]
impl<T: CollectionItem> RemoteCollection<T> for FakeBackend<T> {
    async fn list(&self, query: &ListQuery) -> Result<ListResult<T>> {
        lock(&self.seen_queries).push(query.clone());
        let planned = lock(&self.lists)
            .pop_front()
            .expect("unplanned list call");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        resolve(planned).await
    }

    async fn get(&self, id: &EntityId) -> Result<T> {
        Err(TallyLinkError::Server {
            status_code: 404,
            message: format!("unplanned get for {id}"),
        })
    }

    async fn create(&self, _payload: serde_json::Value) -> Result<T> {
        let planned = lock(&self.creates)
            .pop_front()
            .expect("unplanned create call");
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        resolve(planned).await
    }

    async fn update(&self, _id: &EntityId, _payload: serde_json::Value) -> Result<T> {
        let planned = lock(&self.updates)
            .pop_front()
            .expect("unplanned update call");
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        resolve(planned).await
    }

    async fn remove(&self, _id: &EntityId) -> Result<()> {
        let planned = lock(&self.removes)
            .pop_front()
            .expect("unplanned remove call");
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        resolve(planned).await
    }
}

fn lock<L>(mutex: &Mutex<L>) -> MutexGuard<'_, L> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Toast sink capturing everything for assertions.
#[derive(Default)]
pub struct CapturingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Notifier for CapturingNotifier {
    fn success(&self, message: &str) {
        lock(&self.successes).push(message.to_string());
    }

    fn error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        id: EntityId::from(id),
        name: name.to_string(),
        sku: None,
        category: None,
        price: 1.0,
        stock: 0,
        active: true,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn cashier(id: i64, name: &str) -> Cashier {
    Cashier {
        id: EntityId::from(id),
        name: name.to_string(),
        code: format!("C-{id}"),
        active: true,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn page<T>(items: Vec<T>, total_items: u64) -> ListResult<T> {
    ListResult { items, total_items }
}

/// Poll until the condition holds; panics after ~1 second.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within timeout");
}
