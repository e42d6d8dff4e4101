use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A client avatar's placement: position plus Euler-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DVec3,
}

impl Pose {
    pub fn new(position: DVec3, rotation: DVec3) -> Self {
        Self { position, rotation }
    }
}

/// Messages clients send to the relay.
///
/// JSON text frames tagged by a `type` field, e.g.
/// `{"type":"positionUpdate","id":"...","position":[x,y,z],"rotation":[x,y,z]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// New pose for the client identified by `id`.
    #[serde(rename = "positionUpdate")]
    PositionUpdate {
        id: String,
        position: DVec3,
        rotation: DVec3,
    },
}

/// Messages the relay sends back to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Tells a freshly accepted client which id the relay assigned to it.
    /// Sent once, to that client only, before its first snapshot.
    #[serde(rename = "sessionAssigned")]
    SessionAssigned { id: String },
    /// Full registry snapshot, broadcast to every client on every change.
    #[serde(rename = "clientUpdates")]
    ClientUpdates { clients: HashMap<String, Pose> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_update_wire_shape() {
        let frame = r#"{"type":"positionUpdate","id":"a1","position":[1.0,0.0,1.0],"rotation":[0.0,0.5,0.0]}"#;
        let msg: ClientMessage = serde_json::from_str(frame).unwrap();

        let ClientMessage::PositionUpdate { id, position, rotation } = msg;
        assert_eq!(id, "a1");
        assert_eq!(position, DVec3::new(1.0, 0.0, 1.0));
        assert_eq!(rotation, DVec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_client_updates_wire_shape() {
        let mut clients = HashMap::new();
        clients.insert(
            "a1".to_string(),
            Pose::new(DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.0, 0.5, 0.0)),
        );

        let value = serde_json::to_value(ServerMessage::ClientUpdates { clients }).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "clientUpdates",
                "clients": {
                    "a1": {
                        "position": [1.0, 0.0, 1.0],
                        "rotation": [0.0, 0.5, 0.0],
                    }
                }
            })
        );
    }

    #[test]
    fn test_session_assigned_wire_shape() {
        let value = serde_json::to_value(ServerMessage::SessionAssigned {
            id: "a1".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"type": "sessionAssigned", "id": "a1"}));
    }

    #[test]
    fn test_malformed_frame_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"positionUpdate","id":"a1"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }
}
