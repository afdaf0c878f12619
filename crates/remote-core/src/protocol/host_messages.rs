//! Host → controller frames.
//!
//! ```json
//! {"type":"welcome","timestamp":1718000000000}
//! {"type":"status","connectedClients":2}
//! {"type":"error","message":"Unsupported event type: teleport"}
//! {"type":"heartbeat_ack","timestamp":1718000000123}
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Every frame the host sends to a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Sent once, right after a controller connects.
    Welcome { timestamp: u64 },

    /// Broadcast to every open connection whenever membership changes.
    Status {
        #[serde(rename = "connectedClients")]
        connected_clients: usize,
    },

    /// Reply to an invalid frame.  The connection stays open.
    Error { message: String },

    /// Immediate reply to a heartbeat.
    HeartbeatAck { timestamp: u64 },
}

impl HostMessage {
    /// A `welcome` frame stamped with the current time.
    pub fn welcome_now() -> Self {
        Self::Welcome {
            timestamp: current_timestamp_ms(),
        }
    }

    /// A `heartbeat_ack` frame stamped with the current time.
    pub fn heartbeat_ack_now() -> Self {
        Self::HeartbeatAck {
            timestamp: current_timestamp_ms(),
        }
    }

    /// Serializes the message into the JSON text of one frame.
    ///
    /// # Errors
    ///
    /// Returns the serde error; with these field types it cannot occur in
    /// practice, but callers log rather than unwrap.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Milliseconds since the Unix epoch; `0` if the clock is before 1970.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_value(msg: &HostMessage) -> Value {
        serde_json::from_str(&msg.to_frame().unwrap()).unwrap()
    }

    #[test]
    fn test_status_uses_camel_case_client_count() {
        let msg = HostMessage::Status {
            connected_clients: 3,
        };
        assert_eq!(
            to_value(&msg),
            json!({"type": "status", "connectedClients": 3})
        );
    }

    #[test]
    fn test_error_frame_shape() {
        let msg = HostMessage::Error {
            message: "bad".to_string(),
        };
        assert_eq!(to_value(&msg), json!({"type": "error", "message": "bad"}));
    }

    #[test]
    fn test_heartbeat_ack_type_is_snake_case() {
        let value = to_value(&HostMessage::HeartbeatAck { timestamp: 5 });
        assert_eq!(value["type"], "heartbeat_ack");
        assert_eq!(value["timestamp"], 5);
    }

    #[test]
    fn test_welcome_now_carries_a_recent_timestamp() {
        let before = current_timestamp_ms();
        let HostMessage::Welcome { timestamp } = HostMessage::welcome_now() else {
            panic!("expected welcome");
        };
        assert!(timestamp >= before);
    }
}
