use thiserror::Error;

use crate::domain::error::TransportError;

/// A line that is not a valid OpenSSH public key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("Empty public key line")]
    Empty,

    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Missing key material after algorithm {0}")]
    MissingMaterial(String),

    #[error("Invalid base64 key material: {0}")]
    InvalidBase64(String),

    #[error("Malformed key blob: {0}")]
    MalformedBlob(String),

    #[error("Key declared as {declared} but its blob encodes {embedded}")]
    AlgorithmMismatch { declared: String, embedded: String },
}

/// Errors raised by authorized key lists
#[derive(Debug, Error)]
pub enum KeyListError {
    #[error("Index {index} out of range for {len} keys")]
    IndexOutOfRange { index: isize, len: usize },

    /// The index is neither an integer nor a slice
    #[error("Key list indices must be integers or slices, not {0:?}")]
    InvalidIndex(String),

    #[error("Slice step cannot be zero")]
    ZeroSliceStep,

    #[error("Attempt to assign {given} keys to an extended slice of {expected}")]
    SliceLengthMismatch { expected: usize, given: usize },

    /// The formatted key would span more than one line of the key file
    #[error("Key {index} contains a line break and cannot be written")]
    MultiLineKey { index: usize },

    #[error(transparent)]
    Parse(#[from] KeyParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<std::io::Error> for KeyListError {
    fn from(error: std::io::Error) -> Self {
        Self::Transport(TransportError::Io(error))
    }
}
