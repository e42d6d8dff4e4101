pub mod messages;

pub use messages::{ClientMessage, Pose, ServerMessage};

use rand::{rngs::OsRng, RngCore};

/// Generates a fresh opaque client identifier for an accepted connection.
///
/// Identifiers are random 64-bit values rendered as fixed-width hex, so they
/// are never reused across sessions within a process lifetime.
pub fn generate_client_id() -> String {
    format!("{:016x}", OsRng.next_u64())
}
