//! Connection descriptor and capability probing results.

use serde::Serialize;
use uuid::Uuid;

/// Everything a controller needs to connect: advertised over mDNS and
/// encoded into the pairing QR code.
///
/// Serializes as `{"protocol":"ws","host":..,"port":..,"sessionId":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescriptor {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub session_id: String,
}

impl ConnectionDescriptor {
    /// Creates a descriptor with a fresh random session id.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_session(host, port, Uuid::new_v4().to_string())
    }

    pub fn with_session(host: impl Into<String>, port: u16, session_id: impl Into<String>) -> Self {
        Self {
            protocol: "ws".to_string(),
            host: host.into(),
            port,
            session_id: session_id.into(),
        }
    }

    /// `ws://host:port`
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Compact JSON form used as the QR payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of probing whether a backend or tool works on this machine.
///
/// Probes are expensive (spawning a process, opening a display
/// connection), so the result is cached and `Untested` means "not asked
/// yet" rather than "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    #[default]
    Untested,
    Available,
    Unavailable,
}

impl Capability {
    pub fn from_probe(ok: bool) -> Self {
        if ok {
            Self::Available
        } else {
            Self::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}
