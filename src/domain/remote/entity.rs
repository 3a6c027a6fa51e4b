//! Remote entity

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub const DEFAULT_SSH_PORT: u16 = 22;

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// A host reachable over SSH as a given login user.
///
/// Remotes are plain values: two remotes built independently from the same
/// user, address and port are equal and hash the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Remote {
    user: String,
    address: IpAddr,
    #[serde(default = "default_port")]
    port: u16,
}

impl Remote {
    /// Create a remote on the default SSH port
    pub fn new(user: impl Into<String>, address: IpAddr) -> Self {
        Self {
            user: user.into(),
            address,
            port: DEFAULT_SSH_PORT,
        }
    }

    /// Set the port (builder pattern)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.address {
            IpAddr::V4(addr) => write!(f, "{}@{}:{}", self.user, addr, self.port),
            IpAddr::V6(addr) => write!(f, "{}@[{}]:{}", self.user, addr, self.port),
        }
    }
}
