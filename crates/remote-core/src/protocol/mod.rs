//! Protocol module containing the frame codec and both message directions.

pub mod codec;
pub mod events;
pub mod host_messages;

pub use codec::{is_heartbeat, parse_frame, InvalidFrame};
pub use events::{InputEvent, KeyAction, EVENT_KINDS};
pub use host_messages::{current_timestamp_ms, HostMessage};
