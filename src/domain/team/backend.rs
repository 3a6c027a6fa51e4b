use async_trait::async_trait;
use std::fmt::Debug;

use super::{CallbackRequest, TeamError};
use crate::domain::identity::{BackendId, Identity};

/// Authentication and membership-authorization capability.
///
/// Implementations wrap one identity provider (an OAuth organization, a
/// directory service, an SSO group claim, ...). Identities carry the
/// [`BackendId`] of the backend that minted them, and a backend must refuse to
/// authorize identities from any other family.
#[async_trait]
pub trait Team: Send + Sync + Debug {
    /// Backend family tag stamped onto every identity this team produces
    fn backend(&self) -> &BackendId;

    /// Build the provider URL the user is redirected to in order to log in.
    ///
    /// `nonce` is echoed back by the provider as `state` and must be kept by
    /// the caller until [`authenticate`](Team::authenticate) runs.
    fn request_authentication(&self, nonce: &str, redirect_url: &str)
        -> Result<String, TeamError>;

    /// Finish the login exchange started by
    /// [`request_authentication`](Team::request_authentication).
    async fn authenticate(
        &self,
        nonce: &str,
        redirect_url: &str,
        callback: &CallbackRequest,
    ) -> Result<Identity, TeamError>;

    /// Whether the identity may access the fleet. Never fails: any error is
    /// an answer of `false`.
    async fn authorize(&self, identity: &Identity) -> bool;
}
