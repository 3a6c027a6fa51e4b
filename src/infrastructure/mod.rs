//! Infrastructure layer - Transports, backends and stores

pub mod http;
pub mod keystore;
pub mod logging;
pub mod remote;
pub mod team;
