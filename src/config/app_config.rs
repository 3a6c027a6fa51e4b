use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{Node, Remote};
use crate::infrastructure::keystore::DEFAULT_AUTHORIZED_KEYS_PATH;
use crate::infrastructure::remote::DEFAULT_CLOUD_LOGIN_USER;
use crate::infrastructure::team::GitHubEndpoints;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub github: Option<GitHubConfig>,
    pub remotes: RemotesConfig,
    pub key_store: KeyStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// OAuth application and organization of the GitHub team backend
#[derive(Clone, Deserialize)]
pub struct GitHubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub org_login: String,
    /// Base URL of a GitHub Enterprise Server
    #[serde(default)]
    pub enterprise_url: Option<String>,
    /// Explicit endpoints; wins over `enterprise_url`
    #[serde(default)]
    pub endpoints: Option<GitHubEndpoints>,
}

impl GitHubConfig {
    pub fn resolved_endpoints(&self) -> GitHubEndpoints {
        match (&self.endpoints, &self.enterprise_url) {
            (Some(endpoints), _) => endpoints.clone(),
            (None, Some(base_url)) => GitHubEndpoints::enterprise(base_url),
            (None, None) => GitHubEndpoints::default(),
        }
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[hidden]")
            .field("org_login", &self.org_login)
            .field("enterprise_url", &self.enterprise_url)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemotesConfig {
    /// Named remotes reachable without an inventory
    #[serde(rename = "static")]
    pub static_remotes: HashMap<String, Remote>,
    /// Login user for every inventory node
    pub cloud_user: String,
    /// Inventory service answering with a JSON node list
    pub inventory_url: Option<String>,
    pub inventory_token: Option<String>,
    /// Fixed inventory used when no `inventory_url` is set
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyStoreConfig {
    /// Key file path relative to the login user's home
    pub authorized_keys_path: String,
    /// Local directory standing in for the home directory of the target host
    pub root: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RemotesConfig {
    fn default() -> Self {
        Self {
            static_remotes: HashMap::new(),
            cloud_user: DEFAULT_CLOUD_LOGIN_USER.to_string(),
            inventory_url: None,
            inventory_token: None,
            nodes: Vec::new(),
        }
    }
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            authorized_keys_path: DEFAULT_AUTHORIZED_KEYS_PATH.to_string(),
            root: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/local`, then `KEYGATE__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(config::Environment::with_prefix("KEYGATE"))
    }

    fn load_from(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }
}
