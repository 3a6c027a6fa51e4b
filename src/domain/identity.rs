//! Authenticated principal produced by a successful login

use serde::{Deserialize, Serialize};

/// Tag naming the team backend family that minted an [`Identity`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as seen by one team backend.
///
/// Identities are bearer credentials: whoever holds one can call
/// [`Team::authorize`](crate::domain::team::Team::authorize) and the backend's
/// API with its token. They are only ever built at the end of a successful
/// authentication exchange and never change afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    backend: BackendId,
    name: String,
    access_token: String,
}

impl Identity {
    pub fn new(
        backend: BackendId,
        name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            name: name.into(),
            access_token: access_token.into(),
        }
    }

    pub fn backend(&self) -> &BackendId {
        &self.backend
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("backend", &self.backend)
            .field("name", &self.name)
            .field("access_token", &"[hidden]")
            .finish()
    }
}
