//! Integration tests for the lifecycle supervisor over the real WebSocket
//! transport.
//!
//! Discovery and the pairing code are disabled; everything else is the
//! production wiring with a log-only backend selector.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use remote_core::HostState;
use remote_host::application::{BackendSelector, Gateway, HostExit, InputDispatcher, Supervisor};
use remote_host::infrastructure::discovery::NoopPublisher;
use remote_host::infrastructure::pairing_code::UrlOnlyRenderer;
use remote_host::infrastructure::ws_server::WebSocketTransport;

fn supervisor_on(addr: SocketAddr, max_restart_attempts: u32) -> Supervisor {
    let gateway = Arc::new(Gateway::new(Arc::new(InputDispatcher::new(
        BackendSelector::log_only(),
    ))));
    Supervisor::new(
        Arc::new(WebSocketTransport::new(addr)),
        Arc::new(NoopPublisher),
        Arc::new(UrlOnlyRenderer),
        gateway,
        "127.0.0.1",
        max_restart_attempts,
    )
}

fn loopback_ephemeral() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_bind_failure_exhausts_the_budget_and_exits_non_zero() {
    // Arrange: hold the port so every bind fails.
    let occupied = TcpListener::bind(loopback_ephemeral()).unwrap();
    let mut supervisor = supervisor_on(occupied.local_addr().unwrap(), 3);

    // Act
    let exit = supervisor.run().await;

    // Assert: one initial start plus three restarts, then no more.
    assert_eq!(exit, HostExit::RestartBudgetExhausted);
    assert_eq!(exit.code(), 1);
    assert_eq!(supervisor.start_calls(), 4);
    assert_eq!(supervisor.state(), HostState::Terminated);
    assert!(!supervisor.history().contains(&HostState::Listening));
}

#[tokio::test]
async fn test_zero_budget_never_restarts() {
    let occupied = TcpListener::bind(loopback_ephemeral()).unwrap();
    let mut supervisor = supervisor_on(occupied.local_addr().unwrap(), 0);

    let exit = supervisor.run().await;

    assert_eq!(exit, HostExit::RestartBudgetExhausted);
    assert_eq!(supervisor.start_calls(), 1);
}

#[tokio::test]
async fn test_shutdown_wins_over_later_faults() {
    // Arrange
    let mut supervisor = supervisor_on(loopback_ephemeral(), 3);
    let handle = supervisor.handle();
    let task = tokio::spawn(async move {
        let exit = supervisor.run().await;
        (exit, supervisor)
    });
    settle().await;

    // Act
    handle.shutdown("SIGTERM");
    handle.report_fatal(1, "late listener error");
    handle.shutdown("SIGINT");
    let (exit, supervisor) = task.await.unwrap();

    // Assert
    assert_eq!(exit, HostExit::Graceful);
    assert_eq!(exit.code(), 0);
    assert_eq!(supervisor.start_calls(), 1);
    assert_eq!(
        supervisor.history(),
        &[
            HostState::Idle,
            HostState::Starting,
            HostState::Listening,
            HostState::ShuttingDown,
            HostState::Terminated,
        ]
    );
}

#[tokio::test]
async fn test_successful_restarts_reset_the_budget() {
    // Arrange: a budget of one restart.
    let mut supervisor = supervisor_on(loopback_ephemeral(), 1);
    let handle = supervisor.handle();
    let task = tokio::spawn(async move {
        let exit = supervisor.run().await;
        (exit, supervisor)
    });
    settle().await;

    // Act: three faults, each in the then-current generation, each followed
    // by a successful restart.
    for generation in 1..=3 {
        handle.report_fatal(generation, "listener error");
        settle().await;
    }
    handle.shutdown("SIGINT");
    let (exit, supervisor) = task.await.unwrap();

    // Assert
    assert_eq!(exit, HostExit::Graceful);
    assert_eq!(supervisor.start_calls(), 4);
    assert_eq!(supervisor.generation(), 4);
    assert_eq!(supervisor.restart_budget().attempts(), 0);
}

#[tokio::test]
async fn test_stale_generation_fault_is_ignored() {
    let mut supervisor = supervisor_on(loopback_ephemeral(), 3);
    let handle = supervisor.handle();
    let task = tokio::spawn(async move {
        let exit = supervisor.run().await;
        (exit, supervisor)
    });
    settle().await;

    handle.report_fatal(1, "real fault");
    settle().await;
    handle.report_fatal(1, "echo from the old listener");
    settle().await;
    handle.shutdown("SIGINT");
    let (_, supervisor) = task.await.unwrap();

    assert_eq!(supervisor.start_calls(), 2);
}
