//! Shared test doubles for the catalog collaborators.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use shared::domain::{CatalogId, CatalogItem};
use tokio::sync::{Mutex, Notify};

use crate::{
    confirmation::ConfirmationGate,
    error::{RemoteError, RemoteErrorKind},
    manager::CatalogHost,
    notify::Notifier,
    remote::RemoteCatalog,
};

/// Server stand-in that enforces referential integrity for `referenced` ids.
pub struct InMemoryCatalog {
    items: Mutex<Vec<CatalogItem>>,
    next_id: Mutex<i64>,
    referenced: HashSet<CatalogId>,
    fail_next: Mutex<Option<RemoteError>>,
    fail_fetch: Mutex<bool>,
    pub fetch_calls: AtomicUsize,
    pub mutation_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let next_id = items
            .iter()
            .filter_map(|item| match item.id {
                CatalogId::Int(id) => Some(id),
                CatalogId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            items: Mutex::new(items),
            next_id: Mutex::new(next_id),
            referenced: HashSet::new(),
            fail_next: Mutex::new(None),
            fail_fetch: Mutex::new(false),
            fetch_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_referenced(mut self, id: impl Into<CatalogId>) -> Self {
        self.referenced.insert(id.into());
        self
    }

    pub async fn fail_next_mutation(&self, err: RemoteError) {
        *self.fail_next.lock().await = Some(err);
    }

    pub async fn fail_fetches(&self, fail: bool) {
        *self.fail_fetch.lock().await = fail;
    }

    /// Simulates a change made by another client.
    pub async fn external_insert(&self, name: &str) -> CatalogItem {
        let mut next_id = self.next_id.lock().await;
        let item = CatalogItem::new(*next_id, name);
        *next_id += 1;
        self.items.lock().await.push(item.clone());
        item
    }

    pub async fn names(&self) -> Vec<String> {
        self.items
            .lock()
            .await
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    async fn take_failure(&self) -> Option<RemoteError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_next.lock().await.take()
    }
}

#[async_trait]
impl RemoteCatalog for InMemoryCatalog {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_fetch.lock().await {
            return Err(RemoteError::unknown("connection reset"));
        }
        Ok(self.items.lock().await.clone())
    }

    async fn create(&self, name: &str) -> Result<CatalogItem, RemoteError> {
        if let Some(err) = self.take_failure().await {
            return Err(err);
        }
        let mut next_id = self.next_id.lock().await;
        let item = CatalogItem::new(*next_id, name);
        *next_id += 1;
        self.items.lock().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &CatalogId, name: &str) -> Result<CatalogItem, RemoteError> {
        if let Some(err) = self.take_failure().await {
            return Err(err);
        }
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| RemoteError::new(RemoteErrorKind::NotFound, "Not found."))?;
        item.name = name.to_string();
        Ok(item.clone())
    }

    async fn remove(&self, id: &CatalogId) -> Result<(), RemoteError> {
        if let Some(err) = self.take_failure().await {
            return Err(err);
        }
        if self.referenced.contains(id) {
            return Err(RemoteError::from_detail(format!(
                "Cannot delete some instances of model because they are referenced through protected foreign keys: {id}"
            )));
        }
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(RemoteError::new(RemoteErrorKind::NotFound, "Not found."));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    successes: std::sync::Mutex<Vec<String>>,
    errors: std::sync::Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("notifier lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.successes
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        self.errors
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }
}

pub struct ScriptedGate {
    answer: bool,
    pub asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedGate {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn ask(&self, message: &str, title: &str) -> bool {
        self.asked
            .lock()
            .await
            .push((message.to_string(), title.to_string()));
        self.answer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Add(String),
    Edit(CatalogId, String),
    Delete(CatalogId),
}

/// Host that records calls and can hold them open until released.
pub struct RecordingHost {
    list: Mutex<Vec<CatalogItem>>,
    pub calls: Mutex<Vec<HostCall>>,
    fail_with: Mutex<Option<RemoteError>>,
    hold: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl RecordingHost {
    pub fn new(list: Vec<CatalogItem>) -> Self {
        Self {
            list: Mutex::new(list),
            calls: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
            hold: None,
        }
    }

    /// Calls block until `release` is notified; `entered` fires when a call
    /// starts waiting.
    pub fn holding(list: Vec<CatalogItem>, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            hold: Some((entered, release)),
            ..Self::new(list)
        }
    }

    pub async fn fail_with(&self, err: RemoteError) {
        *self.fail_with.lock().await = Some(err);
    }

    pub async fn clear_failure(&self) {
        *self.fail_with.lock().await = None;
    }

    pub async fn replace_list(&self, list: Vec<CatalogItem>) {
        *self.list.lock().await = list;
    }

    pub async fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: HostCall) -> Result<(), RemoteError> {
        self.calls.lock().await.push(call);
        if let Some((entered, release)) = &self.hold {
            entered.notify_one();
            release.notified().await;
        }
        match self.fail_with.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogHost for RecordingHost {
    async fn current_list(&self) -> Vec<CatalogItem> {
        self.list.lock().await.clone()
    }

    async fn add(&self, name: &str) -> Result<(), RemoteError> {
        self.record(HostCall::Add(name.to_string())).await
    }

    async fn edit(&self, id: &CatalogId, name: &str) -> Result<(), RemoteError> {
        self.record(HostCall::Edit(id.clone(), name.to_string()))
            .await
    }

    async fn delete(&self, id: &CatalogId) -> Result<(), RemoteError> {
        self.record(HostCall::Delete(id.clone())).await
    }
}
