use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, Span};

use crate::domain::{InventoryDriver, InventoryError, Remote, RemoteSet};

/// Login user of stock cloud images when none is configured
pub const DEFAULT_CLOUD_LOGIN_USER: &str = "ec2-user";

/// Read-only mapping from inventory node id to [`Remote`].
///
/// Every lookup asks the driver again, so entries are exactly what the
/// inventory reports at that moment. Nodes reporting neither a public nor a
/// private address cannot be reached and are left out.
#[derive(Clone)]
pub struct CloudRemoteSet {
    driver: Arc<dyn InventoryDriver>,
    login_user: String,
    span: Span,
}

impl CloudRemoteSet {
    pub fn new(driver: Arc<dyn InventoryDriver>, login_user: impl Into<String>) -> Self {
        Self {
            driver,
            login_user: login_user.into(),
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn login_user(&self) -> &str {
        &self.login_user
    }

    /// `(node id, remote)` pairs in driver order
    #[instrument(
        parent = &self.span,
        name = "cloud_remotes.list",
        skip_all,
        fields(login_user = %self.login_user)
    )]
    pub async fn entries(&self) -> Result<Vec<(String, Remote)>, InventoryError> {
        let nodes = self.driver.list_nodes().await?;
        let total = nodes.len();

        let entries: Vec<(String, Remote)> = nodes
            .into_iter()
            .filter_map(|node| match node.preferred_address() {
                Some(address) => Some((node.id, Remote::new(self.login_user.as_str(), address))),
                None => {
                    debug!(node = %node.id, "Skipping node without an address");
                    None
                }
            })
            .collect();

        debug!(total, reachable = entries.len(), "Listed inventory nodes");
        Ok(entries)
    }

    pub async fn to_map(&self) -> Result<HashMap<String, Remote>, InventoryError> {
        Ok(self.entries().await?.into_iter().collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Remote>, InventoryError> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .find(|(node_id, _)| node_id == id)
            .map(|(_, remote)| remote))
    }

    pub async fn contains(&self, id: &str) -> Result<bool, InventoryError> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn len(&self) -> Result<usize, InventoryError> {
        Ok(self.entries().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, InventoryError> {
        Ok(self.len().await? == 0)
    }

    pub async fn ids(&self) -> Result<Vec<String>, InventoryError> {
        Ok(self.entries().await?.into_iter().map(|(id, _)| id).collect())
    }
}

impl std::fmt::Debug for CloudRemoteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudRemoteSet")
            .field("login_user", &self.login_user)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteSet for CloudRemoteSet {
    async fn remotes(&self) -> Result<HashMap<String, Remote>, InventoryError> {
        self.to_map().await
    }

    async fn remote(&self, name: &str) -> Result<Option<Remote>, InventoryError> {
        self.get(name).await
    }
}
