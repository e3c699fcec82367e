//! Add/edit/delete mediation for a single catalog.
//!
//! The manager never owns the list. It reads the host's current list on every
//! operation and forwards mutations to the host, which reloads the
//! authoritative list before a mutation resolves. The only state kept here is
//! the [`EditSession`] buffer.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{CatalogId, CatalogItem, CatalogKind};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    confirmation::ConfirmationGate,
    error::{ManagerError, RemoteError},
    validation::{filter_input, validate_name},
};

/// Container that owns the catalog list and performs the remote mutations.
#[async_trait]
pub trait CatalogHost: Send + Sync {
    async fn current_list(&self) -> Vec<CatalogItem>;
    async fn add(&self, name: &str) -> Result<(), RemoteError>;
    async fn edit(&self, id: &CatalogId, name: &str) -> Result<(), RemoteError>;
    async fn delete(&self, id: &CatalogId) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub placeholder: String,
    pub delete_title: String,
    pub entity_label: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            placeholder: "Enter a name".into(),
            delete_title: "Confirm deletion".into(),
            entity_label: "item".into(),
        }
    }
}

impl ManagerConfig {
    pub fn for_kind(kind: CatalogKind) -> Self {
        Self {
            placeholder: format!("Enter the {} name", kind.label()),
            entity_label: kind.label().into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Editing(CatalogId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    pub edit_id: Option<CatalogId>,
    pub input: String,
    pub error: Option<String>,
    /// A save or delete of this manager is in flight.
    pub pending: bool,
}

impl EditSession {
    pub fn mode(&self) -> SessionMode {
        match &self.edit_id {
            Some(id) => SessionMode::Editing(id.clone()),
            None => SessionMode::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.edit_id.is_none()
    }

    pub fn label(&self) -> String {
        match &self.edit_id {
            Some(id) => format!("Edit ID {id}"),
            None => "New item".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Added { name: String },
    Updated { id: CatalogId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(CatalogId),
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChange {
    pub value: String,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Enter in the name field.
    Commit,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHandling {
    /// The widget must not run its own submit action for this key.
    pub suppress_default: bool,
    pub saved: Option<SaveOutcome>,
}

#[derive(Default)]
struct ManagerState {
    session: EditSession,
    // Bumped whenever the buffer is replaced, so a save that settles late
    // does not wipe an edit started while it was in flight.
    generation: u64,
}

impl ManagerState {
    fn discard(&mut self) {
        self.session.edit_id = None;
        self.session.input.clear();
        self.session.error = None;
        self.generation += 1;
    }
}

pub struct MasterListManager {
    host: Arc<dyn CatalogHost>,
    gate: Arc<dyn ConfirmationGate>,
    config: ManagerConfig,
    state: Mutex<ManagerState>,
}

impl MasterListManager {
    pub fn new(
        host: Arc<dyn CatalogHost>,
        gate: Arc<dyn ConfirmationGate>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            host,
            gate,
            config,
            state: Mutex::new(ManagerState::default()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub async fn items(&self) -> Vec<CatalogItem> {
        self.host.current_list().await
    }

    pub async fn snapshot(&self) -> EditSession {
        self.state.lock().await.session.clone()
    }

    /// Loads `id` into the buffer, replacing whatever was being edited.
    /// An id missing from the current list leaves the session untouched.
    pub async fn start_edit(&self, id: &CatalogId) -> Result<(), ManagerError> {
        let list = self.host.current_list().await;
        let Some(item) = list.iter().find(|item| &item.id == id) else {
            warn!(id = %id, "edit requested for an item no longer in the list");
            return Err(ManagerError::StaleItem(id.clone()));
        };

        let mut guard = self.state.lock().await;
        guard.generation += 1;
        guard.session.edit_id = Some(item.id.clone());
        guard.session.input = item.name.clone();
        guard.session.error = None;
        debug!(id = %id, "editing catalog item");
        Ok(())
    }

    pub async fn change_input(&self, raw: &str) -> InputChange {
        let filtered = filter_input(raw);
        let mut guard = self.state.lock().await;
        if filtered.value != guard.session.input {
            guard.session.error = None;
        }
        guard.session.input = filtered.value.clone();
        if filtered.dropped > 0 {
            debug!(dropped = filtered.dropped, "dropped disallowed input characters");
        }
        InputChange {
            value: filtered.value,
            dropped: filtered.dropped,
        }
    }

    pub async fn cancel_edit(&self) {
        self.state.lock().await.discard();
    }

    pub async fn save(&self) -> Result<SaveOutcome, ManagerError> {
        let list = self.host.current_list().await;

        let (edit_id, name, generation) = {
            let mut guard = self.state.lock().await;
            if guard.session.pending {
                return Err(ManagerError::Busy);
            }
            let edit_id = guard.session.edit_id.clone();
            match validate_name(&guard.session.input, &list, edit_id.as_ref()) {
                Ok(name) => {
                    guard.session.pending = true;
                    (edit_id, name, guard.generation)
                }
                Err(err) => {
                    debug!(error = %err, "catalog name rejected");
                    guard.session.error = Some(err.to_string());
                    return Err(err.into());
                }
            }
        };

        let result = match &edit_id {
            Some(id) => self.host.edit(id, &name).await,
            None => self.host.add(&name).await,
        };

        let mut guard = self.state.lock().await;
        guard.session.pending = false;
        match result {
            Ok(()) => {
                if guard.generation == generation {
                    guard.discard();
                }
                let outcome = match edit_id {
                    Some(id) => SaveOutcome::Updated { id, name },
                    None => SaveOutcome::Added { name },
                };
                info!(entity = %self.config.entity_label, ?outcome, "catalog change saved");
                Ok(outcome)
            }
            Err(err) => {
                warn!(entity = %self.config.entity_label, error = %err, "catalog change failed");
                Err(err.into())
            }
        }
    }

    pub async fn request_delete(&self, id: &CatalogId) -> Result<DeleteOutcome, ManagerError> {
        let list = self.host.current_list().await;
        let Some(item) = list.into_iter().find(|item| &item.id == id) else {
            warn!(id = %id, "delete requested for an item no longer in the list");
            return Err(ManagerError::StaleItem(id.clone()));
        };

        {
            let mut guard = self.state.lock().await;
            if guard.session.pending {
                return Err(ManagerError::Busy);
            }
            guard.session.pending = true;
        }

        let message = self.delete_message(&item);
        let confirmed = self.gate.ask(&message, &self.config.delete_title).await;
        if !confirmed {
            self.state.lock().await.session.pending = false;
            debug!(id = %item.id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let result = self.host.delete(&item.id).await;

        let mut guard = self.state.lock().await;
        guard.session.pending = false;
        match result {
            Ok(()) => {
                if guard.session.edit_id.as_ref() == Some(&item.id) {
                    guard.discard();
                }
                info!(entity = %self.config.entity_label, id = %item.id, "catalog item deleted");
                Ok(DeleteOutcome::Deleted(item.id))
            }
            Err(err) => {
                warn!(entity = %self.config.entity_label, id = %item.id, error = %err, "catalog delete failed");
                Err(err.into())
            }
        }
    }

    /// Enter in the name field saves exactly once and swallows the default
    /// submit.
    pub async fn handle_key(&self, key: InputKey) -> Result<KeyHandling, ManagerError> {
        match key {
            InputKey::Commit => {
                let saved = self.save().await?;
                Ok(KeyHandling {
                    suppress_default: true,
                    saved: Some(saved),
                })
            }
            InputKey::Other => Ok(KeyHandling {
                suppress_default: false,
                saved: None,
            }),
        }
    }

    /// Drops the edit buffer if its item disappeared from the host list.
    /// Returns true when it did.
    pub async fn sync_with_list(&self) -> bool {
        let list = self.host.current_list().await;
        let mut guard = self.state.lock().await;
        let Some(edit_id) = guard.session.edit_id.clone() else {
            return false;
        };
        if list.iter().any(|item| item.id == edit_id) {
            return false;
        }
        warn!(id = %edit_id, "edited item vanished from the list; discarding edit");
        guard.discard();
        true
    }

    fn delete_message(&self, item: &CatalogItem) -> String {
        format!(
            "Delete \"{}\" (ID: {})?\n\nThis cannot be undone and may fail if the {} is in use by a patient record.",
            item.name, item.id, self.config.entity_label
        )
    }
}

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod tests;
