use crate::metrics::RelayMetrics;
use crate::network::session::ClientSession;
use crate::network::{RelayError, Result};
use crate::protocol::{generate_client_id, Pose, ServerMessage};
use crate::registry::Registry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound handle for one connected peer.
///
/// Frames are enqueued here and drained onto the socket by the peer's writer
/// task, so a slow or dead recipient never blocks event processing.
#[derive(Debug, Clone)]
pub struct PeerSender {
    tx: UnboundedSender<String>,
}

impl PeerSender {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }

    fn send(&self, frame: String) -> bool {
        self.tx.send(frame).is_ok()
    }
}

/// The relay: the pose registry plus the connected peers, serialized behind a
/// single lock.
///
/// Every connect, pose update and disconnect acquires the lock for the
/// duration of its registry mutation and the resulting fan-out, so no
/// broadcast can ever observe a half-applied state.
pub struct Relay {
    inner: Mutex<RelayInner>,
    metrics: Arc<RelayMetrics>,
}

struct RelayInner {
    registry: Registry,
    peers: HashMap<String, PeerSender>,
}

impl Relay {
    pub fn new(metrics: Arc<RelayMetrics>) -> Self {
        Self {
            inner: Mutex::new(RelayInner {
                registry: Registry::new(),
                peers: HashMap::new(),
            }),
            metrics,
        }
    }

    /// Number of currently connected sessions.
    pub fn session_count(&self) -> usize {
        self.inner.lock().peers.len()
    }

    /// Current registry contents.
    pub fn snapshot(&self) -> HashMap<String, Pose> {
        self.inner.lock().registry.snapshot()
    }

    /// Register a freshly accepted connection.
    ///
    /// Assigns an id, inserts a default-pose registry entry, tells the new
    /// client its id, and broadcasts the updated registry to every connected
    /// client including the new one.
    pub fn connect(&self, sender: PeerSender) -> ClientSession {
        let id = generate_client_id();

        let mut inner = self.inner.lock();
        inner.registry.insert(id.clone());

        let assigned = ServerMessage::SessionAssigned { id: id.clone() };
        if let Ok(frame) = serde_json::to_string(&assigned) {
            sender.send(frame);
        }
        inner.peers.insert(id.clone(), sender);

        let active = inner.peers.len();
        self.metrics
            .connected_sessions
            .store(active as u64, Ordering::Relaxed);
        tracing::info!("Client {} connected - {} active clients", id, active);

        self.broadcast_locked(&mut inner);
        ClientSession::new(id)
    }

    /// Apply a pose update received from `sender_id` targeting `target_id`.
    ///
    /// The update is dropped without a broadcast when the target is not
    /// registered or when a client tries to move another client's avatar.
    pub fn handle_pose_update(&self, sender_id: &str, target_id: &str, pose: Pose) -> Result<()> {
        self.metrics.messages_received.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.lock();

        if sender_id != target_id {
            self.metrics.rejected_updates.fetch_add(1, Ordering::Relaxed);
            return Err(RelayError::Forbidden {
                sender: sender_id.to_string(),
                target: target_id.to_string(),
            });
        }

        if let Err(err) = inner.registry.update(target_id, pose) {
            self.metrics.rejected_updates.fetch_add(1, Ordering::Relaxed);
            return Err(err.into());
        }

        self.broadcast_locked(&mut inner);
        Ok(())
    }

    /// Remove a session and broadcast the shrunken registry to the remaining
    /// clients. Disconnecting an id that is not registered is a no-op.
    pub fn disconnect(&self, id: &str) {
        let mut inner = self.inner.lock();

        let had_peer = inner.peers.remove(id).is_some();
        let had_entry = inner.registry.remove(id);
        if !had_peer && !had_entry {
            return;
        }

        let active = inner.peers.len();
        self.metrics
            .connected_sessions
            .store(active as u64, Ordering::Relaxed);
        tracing::info!("Client {} disconnected - {} active clients", id, active);

        self.broadcast_locked(&mut inner);
    }

    /// Serialize the registry snapshot once and enqueue it to every peer.
    ///
    /// A recipient whose channel is gone is logged and skipped; the frame
    /// still reaches everyone else. The peer itself is removed when its own
    /// disconnect event arrives.
    fn broadcast_locked(&self, inner: &mut RelayInner) {
        let snapshot = ServerMessage::ClientUpdates {
            clients: inner.registry.snapshot(),
        };
        let frame = match serde_json::to_string(&snapshot) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!("Failed to encode registry snapshot: {}", err);
                return;
            }
        };

        for (id, peer) in &inner.peers {
            if !peer.send(frame.clone()) {
                self.metrics.send_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Dropping frame for unreachable client {}", id);
            }
        }

        self.metrics.broadcasts_sent.fetch_add(1, Ordering::Relaxed);
    }
}
