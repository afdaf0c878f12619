//! Infrastructure layer: every adapter that touches the outside world.
//!
//! - **`ws_server`** – TCP listener, WebSocket sessions and the HTTP status
//!   side channel ([`crate::application::Transport`]).
//! - **`backends`** – the concrete input backends and the platform chain.
//! - **`discovery`** – mDNS advertisement.
//! - **`pairing_code`** – terminal QR code.
//! - **`network`** – local address and host name lookup.
//! - **`config_file`** – the optional TOML configuration file.

pub mod backends;
pub mod config_file;
pub mod discovery;
pub mod network;
pub mod pairing_code;
pub mod ws_server;
