use thiserror::Error;

/// Failures raised by the transports the core talks through: remote file
/// sessions and the HTTP client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection to {target} failed: {message}")]
    Connect { target: String, message: String },

    #[error("HTTP transport error: {message}")]
    Http { message: String },

    #[error("Cannot decode response body declared as charset {charset}")]
    UnsupportedCharset { charset: String },
}

impl TransportError {
    pub fn connect(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connect {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }
}

/// Failures raised by host inventory drivers
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory driver {driver} failed: {message}")]
    Driver { driver: String, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl InventoryError {
    pub fn driver(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            driver: driver.into(),
            message: message.into(),
        }
    }
}
