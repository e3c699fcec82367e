use async_trait::async_trait;
use shared::domain::{CatalogId, CatalogItem};

use crate::error::RemoteError;

/// Server side of one catalog. The server is the source of truth; callers
/// never patch their local copy from these results.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, RemoteError>;
    async fn create(&self, name: &str) -> Result<CatalogItem, RemoteError>;
    async fn update(&self, id: &CatalogId, name: &str) -> Result<CatalogItem, RemoteError>;
    async fn remove(&self, id: &CatalogId) -> Result<(), RemoteError>;
}
