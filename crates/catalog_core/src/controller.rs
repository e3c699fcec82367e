use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{CatalogId, CatalogItem, CatalogKind};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::{error::RemoteError, manager::CatalogHost, notify::Notifier, remote::RemoteCatalog};

/// Owner of one catalog's authoritative list.
///
/// Every successful mutation is followed by a full reload before it resolves;
/// the list is only ever replaced wholesale.
pub struct CatalogController {
    label: String,
    remote: Arc<dyn RemoteCatalog>,
    notifier: Arc<dyn Notifier>,
    items: RwLock<Vec<CatalogItem>>,
}

impl CatalogController {
    pub fn new(
        label: impl Into<String>,
        remote: Arc<dyn RemoteCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            label: label.into(),
            remote,
            notifier,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn for_kind(
        kind: CatalogKind,
        remote: Arc<dyn RemoteCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(kind.label(), remote, notifier)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub async fn items(&self) -> Vec<CatalogItem> {
        self.items.read().await.clone()
    }

    /// Replaces the local list with the server's. Returns the new length.
    pub async fn reload(&self) -> Result<usize, RemoteError> {
        let fresh = self.remote.fetch_all().await?;
        let len = fresh.len();
        *self.items.write().await = fresh;
        info!(catalog = %self.label, items = len, "catalog reloaded");
        Ok(len)
    }

    /// Reloads after a mutation the server already accepted. A failed reload
    /// is reported, not returned: the change itself went through.
    async fn settle(&self, success: String) {
        if let Err(err) = self.reload().await {
            warn!(catalog = %self.label, error = %err, "reload after mutation failed");
            self.notifier.notify_error(&format!(
                "{success}, but the list could not be refreshed: {}",
                err.detail
            ));
            return;
        }
        self.notifier.notify_success(&success);
    }

    fn report_failure(&self, action: &str, err: &RemoteError) {
        error!(catalog = %self.label, action, kind = ?err.kind, detail = %err.detail, "catalog mutation failed");
        self.notifier.notify_error(&err.user_message(action, &self.label));
    }
}

#[async_trait]
impl CatalogHost for CatalogController {
    async fn current_list(&self) -> Vec<CatalogItem> {
        self.items().await
    }

    async fn add(&self, name: &str) -> Result<(), RemoteError> {
        match self.remote.create(name).await {
            Ok(created) => {
                self.settle(format!("{} \"{}\" added", self.label, created.name))
                    .await;
                Ok(())
            }
            Err(err) => {
                self.report_failure("add", &err);
                Err(err)
            }
        }
    }

    async fn edit(&self, id: &CatalogId, name: &str) -> Result<(), RemoteError> {
        match self.remote.update(id, name).await {
            Ok(updated) => {
                self.settle(format!("{} \"{}\" updated", self.label, updated.name))
                    .await;
                Ok(())
            }
            Err(err) => {
                self.report_failure("update", &err);
                Err(err)
            }
        }
    }

    async fn delete(&self, id: &CatalogId) -> Result<(), RemoteError> {
        match self.remote.remove(id).await {
            Ok(()) => {
                self.settle(format!("{} {id} deleted", self.label)).await;
                Ok(())
            }
            Err(err) => {
                self.report_failure("delete", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
