//! Glade relay crate.
//!
//! This crate provides the building blocks for the glade pose relay: the wire
//! protocol spoken by browser clients, the in-memory pose registry, the relay
//! core that keeps registry mutation and broadcast fan-out atomic, and an
//! async WebSocket front end built on tokio.

pub mod config;
pub mod metrics;
pub mod network;
pub mod protocol;
pub mod registry;
pub mod relay;

pub use config::RelayConfig;
pub use metrics::RelayMetrics;
pub use network::{ClientSession, RelayError, SessionState, WebSocketServer};
pub use protocol::{ClientMessage, Pose, ServerMessage};
pub use registry::{Registry, RegistryError};
pub use relay::{PeerSender, Relay};
