//! Public keys and the remote stores that hold them

mod error;
mod index;
mod public_key;
mod session;

pub use error::{KeyListError, KeyParseError};
pub use index::{KeyIndex, Slice};
pub use public_key::{KeyCodec, OpenSshCodec, PublicKey};
pub use session::{ByteSink, ByteSource, RemoteFileSession, SessionConnector};

#[cfg(test)]
pub use public_key::fixtures;
#[cfg(test)]
pub use session::mock;
