use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::{InventoryError, Remote, RemoteSet};

/// Remotes named in configuration
#[derive(Debug, Clone, Default)]
pub struct StaticRemoteSet {
    remotes: HashMap<String, Remote>,
}

impl StaticRemoteSet {
    pub fn new(remotes: HashMap<String, Remote>) -> Self {
        Self { remotes }
    }

    pub fn with_remote(mut self, name: impl Into<String>, remote: Remote) -> Self {
        self.remotes.insert(name.into(), remote);
        self
    }
}

#[async_trait]
impl RemoteSet for StaticRemoteSet {
    async fn remotes(&self) -> Result<HashMap<String, Remote>, InventoryError> {
        Ok(self.remotes.clone())
    }

    async fn remote(&self, name: &str) -> Result<Option<Remote>, InventoryError> {
        Ok(self.remotes.get(name).cloned())
    }
}
