//! Remote hosts and the inventories they come from

mod entity;
mod inventory;
mod set;

pub use entity::{Remote, DEFAULT_SSH_PORT};
pub use inventory::{InventoryDriver, Node};
pub use set::RemoteSet;

#[cfg(test)]
pub use inventory::MockInventoryDriver;
