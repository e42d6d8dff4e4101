pub mod session;
pub mod websocket;

pub use session::{ClientSession, SessionState};
pub use websocket::WebSocketServer;

use crate::registry::RegistryError;
use thiserror::Error;

/// Errors emitted by the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("client {sender} may not update client {target}")]
    Forbidden { sender: String, target: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
