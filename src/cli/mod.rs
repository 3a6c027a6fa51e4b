//! CLI module for keygate
//!
//! Subcommands:
//! - `login-url`: print the URL that starts a team login
//! - `login`: finish a login from the callback URL the browser landed on
//! - `remotes`: list configured and discovered remotes
//! - `keys`: read and edit the authorized keys of one remote

pub mod keys;
pub mod login;
pub mod remotes;

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{InventoryDriver, Remote, RemoteSet};
use crate::infrastructure::http::HttpClient;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::remote::{
    CloudRemoteSet, HttpInventoryDriver, StaticInventoryDriver, StaticRemoteSet,
};

/// keygate - SSH key distribution for members of a team
#[derive(Parser)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the authorization URL a user has to visit to log in
    LoginUrl(login::LoginUrlArgs),

    /// Complete a login from the callback URL and check team membership
    Login(login::LoginArgs),

    /// List remotes by name
    Remotes,

    /// Manage the authorized keys of a remote
    Keys(keys::KeysArgs),
}

/// Load `.env`, configuration and logging shared by every subcommand
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    config
}

/// Configured remotes first, then the inventory if one is configured
pub(crate) fn remote_sets(config: &AppConfig) -> anyhow::Result<Vec<Box<dyn RemoteSet>>> {
    let mut sets: Vec<Box<dyn RemoteSet>> = vec![Box::new(StaticRemoteSet::new(
        config.remotes.static_remotes.clone(),
    ))];

    let driver: Option<Arc<dyn InventoryDriver>> = match &config.remotes.inventory_url {
        Some(url) => {
            let client = Arc::new(HttpClient::new()?);
            let mut driver = HttpInventoryDriver::new(client, url.clone());
            if let Some(token) = &config.remotes.inventory_token {
                driver = driver.with_token(token.clone());
            }
            Some(Arc::new(driver))
        }
        None if !config.remotes.nodes.is_empty() => Some(Arc::new(StaticInventoryDriver::new(
            config.remotes.nodes.clone(),
        ))),
        None => None,
    };

    if let Some(driver) = driver {
        sets.push(Box::new(CloudRemoteSet::new(
            driver,
            config.remotes.cloud_user.clone(),
        )));
    }

    Ok(sets)
}

/// Find a remote by name across every remote set
pub(crate) async fn find_remote(config: &AppConfig, name: &str) -> anyhow::Result<Remote> {
    for set in remote_sets(config)? {
        if let Some(remote) = set.remote(name).await? {
            return Ok(remote);
        }
    }

    anyhow::bail!("No remote named {}", name)
}
