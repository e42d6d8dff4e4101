use std::fmt;
use std::time::Instant;

/// Lifecycle of a relay session.
///
/// Terminal at `Disconnected`: a client that reconnects is a brand-new
/// session with a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, WebSocket handshake in progress.
    Connecting,
    /// Registered with the relay.
    Connected,
    /// Connection closed and registry entry removed.
    Disconnected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// A client session as seen by the transport layer.
#[derive(Debug, Clone)]
pub struct ClientSession {
    /// Opaque id assigned at connect time, stable for the session's lifetime.
    pub id: String,
    /// When the session was registered with the relay.
    pub connected_at: Instant,
}

impl ClientSession {
    pub fn new(id: String) -> Self {
        Self {
            id,
            connected_at: Instant::now(),
        }
    }
}
