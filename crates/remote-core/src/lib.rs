//! # remote-core
//!
//! Shared library for the remote-control host containing the JSON wire
//! protocol, the input-event taxonomy, key and modifier translation tables,
//! command canonicalization, and the lifecycle types of the host supervisor.
//!
//! It has zero dependencies on OS APIs, sockets, or async runtimes.  Every
//! type here can be exercised from a plain `#[test]`.
//!
//! # Architecture overview (for beginners)
//!
//! The host accepts a persistent WebSocket connection from a paired
//! controller (typically a phone).  The controller streams small JSON
//! *frames* describing what the user did: "move the pointer by 2.4 px",
//! "tap the A key with cmd held", "turn the volume up".  The host turns each
//! frame into a physical action on the machine it runs on.
//!
//! This crate is the pure foundation of that pipeline:
//!
//! - **`protocol`** – How frames look on the wire.  Raw text is validated and
//!   decoded into a closed set of [`InputEvent`] kinds, and host replies are
//!   encoded as [`HostMessage`]s.
//!
//! - **`input`** – What the host will *do*.  [`HostAction`] is the
//!   platform-neutral action handed to an input backend, and
//!   [`MouseAccumulator`] turns fractional pointer deltas into whole-pixel
//!   moves without losing motion.
//!
//! - **`keymap`** – Key names and modifier synonyms, plus tables translating
//!   them to X11 keysym names and macOS virtual key codes.
//!
//! - **`command`** – The static table mapping free-form command strings such
//!   as `"media.volume_up"` onto a small [`CanonicalCommand`] enum.
//!
//! - **`domain`** – Lifecycle state of the host: [`HostState`] with its
//!   transition table, the [`RestartBudget`], and the
//!   [`ConnectionDescriptor`] advertised to controllers.

pub mod command;
pub mod domain;
pub mod input;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remote_core::InputEvent` instead of `remote_core::protocol::events::InputEvent`.
pub use command::{canonicalize, CanonicalCommand, MuteMode};
pub use domain::{Capability, ConnectionDescriptor, HostState, RestartBudget};
pub use input::{
    ActionCategory, HostAction, MouseAccumulator, MouseButton, PixelStep, ScrollAxis,
    VolumeDirection,
};
pub use keymap::{KeyName, Modifier, ModifierSet, NamedKey};
pub use protocol::codec::{is_heartbeat, parse_frame, InvalidFrame};
pub use protocol::events::{InputEvent, KeyAction};
pub use protocol::host_messages::HostMessage;
