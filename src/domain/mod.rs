//! Domain layer - Core types and the contracts of external collaborators

pub mod error;
pub mod identity;
pub mod keystore;
pub mod remote;
pub mod team;

pub use error::{InventoryError, TransportError};
pub use identity::{BackendId, Identity};
pub use keystore::{
    KeyCodec, KeyIndex, KeyListError, KeyParseError, OpenSshCodec, PublicKey, RemoteFileSession,
    SessionConnector, Slice,
};
pub use remote::{InventoryDriver, Node, Remote, RemoteSet};
pub use team::{CallbackRequest, Team, TeamError};
