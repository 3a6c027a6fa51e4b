//! keygate
//!
//! Distributes SSH public keys to remote hosts on behalf of team members:
//! - Team backends authenticate users through OAuth and authorize them by
//!   organization membership
//! - Remotes are configured by name or discovered from a live inventory
//! - Authorized keys of a remote are edited as a lazily read list

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
