use crate::protocol::Pose;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown client id: {0}")]
    UnknownClient(String),
}

/// Last-known pose of every connected client.
///
/// An entry exists exactly while the owning connection is open: inserted with
/// the default pose at connect time, overwritten by pose updates, removed once
/// at disconnect and never resurrected under the same id.
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<String, Pose>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clients.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Pose> {
        self.clients.get(id).copied()
    }

    /// Register a new client at the default pose.
    pub fn insert(&mut self, id: String) {
        self.clients.insert(id, Pose::default());
    }

    /// Overwrite the pose stored for `id`.
    pub fn update(&mut self, id: &str, pose: Pose) -> Result<(), RegistryError> {
        match self.clients.get_mut(id) {
            Some(entry) => {
                *entry = pose;
                Ok(())
            }
            None => Err(RegistryError::UnknownClient(id.to_string())),
        }
    }

    /// Remove `id`, reporting whether it was present. Removing an absent id
    /// is a safe no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        self.clients.remove(id).is_some()
    }

    /// Clone of the full id -> pose map, in the form broadcast to clients.
    pub fn snapshot(&self) -> HashMap<String, Pose> {
        self.clients.clone()
    }
}
