//! Cloud inventory driver contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::domain::error::InventoryError;

#[cfg(test)]
use mockall::automock;

/// A machine as reported by an inventory driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Login user the driver suggests. Remote sets log in as their configured
    /// user and ignore it.
    #[serde(default)]
    pub user_hint: Option<String>,
    #[serde(default)]
    pub public_address: Option<IpAddr>,
    #[serde(default)]
    pub private_address: Option<IpAddr>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_hint: None,
            public_address: None,
            private_address: None,
        }
    }

    pub fn with_user_hint(mut self, user: impl Into<String>) -> Self {
        self.user_hint = Some(user.into());
        self
    }

    pub fn with_public_address(mut self, address: IpAddr) -> Self {
        self.public_address = Some(address);
        self
    }

    pub fn with_private_address(mut self, address: IpAddr) -> Self {
        self.private_address = Some(address);
        self
    }

    /// Public address when the driver reports one, private otherwise
    pub fn preferred_address(&self) -> Option<IpAddr> {
        self.public_address.or(self.private_address)
    }
}

/// Source of the live node list (a cloud API, an inventory service, ...)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InventoryDriver: Send + Sync {
    /// Current nodes. Called on every access; implementations must not cache.
    async fn list_nodes(&self) -> Result<Vec<Node>, InventoryError>;
}
