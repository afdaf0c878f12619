//! remote-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! - **`domain`** – runtime configuration.
//! - **`application`** – dispatcher, backend selector, gateway and the
//!   lifecycle supervisor.  No sockets, processes or mDNS.
//! - **`infrastructure`** – the WebSocket transport, input backends,
//!   discovery, pairing code and config file loading.

pub mod application;
pub mod domain;
pub mod infrastructure;
