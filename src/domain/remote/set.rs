use async_trait::async_trait;
use std::collections::HashMap;

use super::Remote;
use crate::domain::error::InventoryError;

/// Named collection of remotes, either configured or discovered
#[async_trait]
pub trait RemoteSet: Send + Sync {
    /// Snapshot of every remote keyed by name
    async fn remotes(&self) -> Result<HashMap<String, Remote>, InventoryError>;

    /// Look up a single remote by name
    async fn remote(&self, name: &str) -> Result<Option<Remote>, InventoryError> {
        Ok(self.remotes().await?.remove(name))
    }
}
