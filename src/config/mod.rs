//! Configuration module

mod app_config;

pub use app_config::{
    AppConfig, GitHubConfig, KeyStoreConfig, LogFormat, LoggingConfig, RemotesConfig,
};
