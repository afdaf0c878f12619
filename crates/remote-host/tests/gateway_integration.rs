//! Integration tests for the connection gateway.
//!
//! Real gateway, dispatcher and selector; the only double is a
//! `RecordingBackend` in place of physical input.

use std::net::SocketAddr;
use std::sync::Arc;

use remote_core::{ActionCategory, HostAction, VolumeDirection};
use remote_host::application::{
    BackendSelector, DispatchOutcome, FrameDisposition, Gateway, InputBackend, InputDispatcher,
    Outbound,
};
use remote_host::infrastructure::backends::RecordingBackend;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

fn peer(port: u16) -> SocketAddr {
    SocketAddr::from(([192, 168, 1, 50], port))
}

fn gateway_with(backend: &Arc<RecordingBackend>) -> Gateway {
    let backend: Arc<dyn InputBackend> = Arc::clone(backend) as Arc<dyn InputBackend>;
    let selector = BackendSelector::new(vec![backend]);
    Gateway::new(Arc::new(InputDispatcher::new(selector)))
}

/// Every frame queued so far, parsed as JSON.
fn drain(rx: &mut UnboundedReceiver<Outbound>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(out) = rx.try_recv() {
        if let Outbound::Frame(text) = out {
            frames.push(serde_json::from_str(&text).expect("host frames are JSON"));
        }
    }
    frames
}

fn last_status_count(frames: &[Value]) -> Option<u64> {
    frames
        .iter()
        .rev()
        .find(|f| f["type"] == "status")
        .and_then(|f| f["connectedClients"].as_u64())
}

#[tokio::test]
async fn test_every_client_sees_the_final_count() {
    // Arrange
    let backend = Arc::new(RecordingBackend::new("rec"));
    let gateway = gateway_with(&backend);

    // Act
    let mut receivers = Vec::new();
    for port in 0..4 {
        let (_, rx) = gateway.on_connect(peer(40_000 + port)).await;
        receivers.push(rx);
    }

    // Assert
    for rx in &mut receivers {
        let frames = drain(rx);
        assert_eq!(last_status_count(&frames), Some(4));
    }
    assert_eq!(gateway.client_count().await, 4);
}

#[tokio::test]
async fn test_welcome_precedes_status() {
    let gateway = gateway_with(&Arc::new(RecordingBackend::new("rec")));

    let (_, mut rx) = gateway.on_connect(peer(1)).await;

    let frames = drain(&mut rx);
    assert_eq!(frames[0]["type"], "welcome");
    assert!(frames[0]["timestamp"].as_u64().is_some());
    assert_eq!(frames[1]["type"], "status");
    assert_eq!(frames[1]["connectedClients"], 1);
}

#[tokio::test]
async fn test_malformed_frames_keep_the_client_connected() {
    // Arrange
    let backend = Arc::new(RecordingBackend::new("rec"));
    let gateway = gateway_with(&backend);
    let (id, mut rx) = gateway.on_connect(peer(2)).await;
    drain(&mut rx);

    // Act
    let inputs: [&[u8]; 4] = [
        b"not json",
        b"[1, 2, 3]",
        br#"{"type":"teleport"}"#,
        br#"{"deltaX": 5}"#,
    ];
    for raw in inputs {
        let disposition = gateway.on_message(id, raw).await;
        assert!(matches!(disposition, FrameDisposition::Rejected(_)));
    }

    // Assert
    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 4);
    assert!(frames.iter().all(|f| f["type"] == "error"));
    assert!(frames
        .iter()
        .all(|f| !f["message"].as_str().unwrap_or_default().is_empty()));
    assert_eq!(gateway.client_count().await, 1);
    assert_eq!(backend.attempts(), 0);
}

#[tokio::test]
async fn test_heartbeat_is_acknowledged_without_dispatch() {
    let backend = Arc::new(RecordingBackend::new("rec"));
    let gateway = gateway_with(&backend);
    let (id, mut rx) = gateway.on_connect(peer(3)).await;
    drain(&mut rx);

    let disposition = gateway.on_message(id, br#"{"type":"heartbeat"}"#).await;

    assert_eq!(disposition, FrameDisposition::HeartbeatAcked);
    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "heartbeat_ack");
    assert_eq!(backend.attempts(), 0);
}

#[tokio::test]
async fn test_command_synonyms_reach_the_backend_identically() {
    // Arrange
    let backend = Arc::new(RecordingBackend::new("rec"));
    let gateway = gateway_with(&backend);
    let (id, _rx) = gateway.on_connect(peer(4)).await;

    // Act
    for name in ["volume.up", "volume_up", "media.volume_up", "media_volume_up"] {
        let frame = format!(r#"{{"type":"command","command":"{name}"}}"#);
        gateway.on_message(id, frame.as_bytes()).await;
    }

    // Assert
    let expected = HostAction::AdjustVolume {
        direction: VolumeDirection::Up,
        step: 6,
    };
    assert_eq!(backend.performed(), vec![expected; 4]);
}

#[tokio::test]
async fn test_backend_failure_is_not_reported_to_the_client() {
    // Arrange
    let backend = Arc::new(RecordingBackend::failing("broken"));
    let gateway = gateway_with(&backend);
    let (id, mut rx) = gateway.on_connect(peer(5)).await;
    drain(&mut rx);

    // Act
    let disposition = gateway
        .on_message(id, br#"{"type":"text_input","text":"hello"}"#)
        .await;

    // Assert
    assert_eq!(
        disposition,
        FrameDisposition::Dispatched(DispatchOutcome::LoggedOnly)
    );
    assert!(drain(&mut rx).is_empty());
    assert_eq!(gateway.client_count().await, 1);
}

#[tokio::test]
async fn test_disconnect_rebroadcasts_and_is_idempotent() {
    let gateway = gateway_with(&Arc::new(RecordingBackend::new("rec")));
    let (first, _first_rx) = gateway.on_connect(peer(6)).await;
    let (_, mut second_rx) = gateway.on_connect(peer(7)).await;
    drain(&mut second_rx);

    assert!(gateway.on_disconnect(first).await);
    assert!(!gateway.on_disconnect(first).await);

    let frames = drain(&mut second_rx);
    assert_eq!(frames.len(), 1);
    assert_eq!(last_status_count(&frames), Some(1));
}

#[tokio::test]
async fn test_sub_pixel_moves_accumulate_across_frames() {
    // Arrange
    let backend = Arc::new(
        RecordingBackend::new("rec").with_categories(&[ActionCategory::PointerMove]),
    );
    let gateway = gateway_with(&backend);
    let (id, _rx) = gateway.on_connect(peer(8)).await;

    // Act: three 0.4 px moves
    for _ in 0..3 {
        gateway
            .on_message(id, br#"{"type":"mouse_move","deltaX":0.4,"deltaY":0}"#)
            .await;
    }

    // Assert: only the third crosses a whole pixel
    assert_eq!(
        backend.performed(),
        vec![HostAction::MovePointer { dx: 1, dy: 0 }]
    );
}

#[tokio::test]
async fn test_status_report_reflects_the_client_set() {
    let gateway = gateway_with(&Arc::new(RecordingBackend::new("rec")));
    let (_, _a) = gateway.on_connect(peer(9)).await;
    let (_, _b) = gateway.on_connect(peer(10)).await;

    let body = serde_json::to_value(gateway.status_report().await).unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["clients"], 2);
    assert!(body["message"].is_string());
}
