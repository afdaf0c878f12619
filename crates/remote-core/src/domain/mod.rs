//! Domain entities of the remote-control host.
//!
//! Pure lifecycle and pairing types with no infrastructure dependencies.
//!
//! # What lives here (for beginners)
//!
//! - [`lifecycle`] – the host's state machine ([`HostState`]) and the
//!   [`RestartBudget`] that bounds how many times a failed listener may be
//!   brought back up.
//! - [`descriptor`] – the [`ConnectionDescriptor`] a controller needs to
//!   find and connect to the host, and [`Capability`], the three-valued
//!   answer to "can this machine do X?".
//!
//! The supervisor in `remote-host` drives these types; keeping them here
//! means the transition rules can be unit-tested without sockets or a
//! runtime.

pub mod descriptor;
pub mod lifecycle;

pub use descriptor::{Capability, ConnectionDescriptor};
pub use lifecycle::{HostState, RestartBudget, DEFAULT_MAX_RESTART_ATTEMPTS};
