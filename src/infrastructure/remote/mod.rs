//! Remote sets and inventory drivers

mod cloud;
mod inventory;
mod static_set;

pub use cloud::{CloudRemoteSet, DEFAULT_CLOUD_LOGIN_USER};
pub use inventory::{HttpInventoryDriver, StaticInventoryDriver};
pub use static_set::StaticRemoteSet;
