//! Team domain module
//!
//! A team turns an external identity provider into an access gate: it runs
//! the login exchange that produces an [`Identity`](crate::domain::Identity)
//! and later answers whether that identity still belongs to the group that is
//! allowed onto the fleet.

mod backend;
mod callback;
mod error;

pub use backend::Team;
pub use callback::CallbackRequest;
pub use error::TeamError;
