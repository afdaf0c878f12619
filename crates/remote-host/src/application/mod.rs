//! Application layer for the host.
//!
//! Contains the use cases that sit between the wire protocol and the
//! operating system:
//!
//! - **`selector`** – ordered backend chains and the [`InputBackend`] seam.
//! - **`dispatcher`** – turns [`remote_core::InputEvent`]s into
//!   [`remote_core::HostAction`]s, owning the mouse accumulator.
//! - **`gateway`** – the active-client set, replies and status broadcasts.
//! - **`supervisor`** – the lifecycle state machine with bounded restarts.
//!
//! **Dependency rule**: this layer depends on `remote_core` and on the
//! traits it defines itself.  Concrete sockets, processes and mDNS live in
//! `infrastructure`.

pub mod dispatcher;
pub mod gateway;
pub mod selector;
pub mod supervisor;

pub use dispatcher::InputDispatcher;
pub use gateway::{ConnectionId, FrameDisposition, Gateway, Outbound, StatusReport};
pub use selector::{BackendError, BackendSelector, DispatchOutcome, InputBackend};
pub use supervisor::{
    ActiveListener, DiscoveryError, DiscoveryPublisher, FaultReporter, HostExit,
    PairingCodeRenderer, RenderError, Supervisor, SupervisorHandle, SupervisorSignal, Transport,
    TransportError,
};
