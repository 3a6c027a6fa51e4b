//! Authorized key stores on remote hosts

mod authorized_keys;
mod local;

pub use authorized_keys::{AuthorizedKeyList, DEFAULT_AUTHORIZED_KEYS_PATH};
pub use local::LocalDirectoryConnector;
