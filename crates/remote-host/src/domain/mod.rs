//! Domain layer for the host binary.
//!
//! Only plain configuration lives here; the lifecycle and protocol types are
//! shared through `remote-core`.

pub mod config;

pub use config::HostConfig;
