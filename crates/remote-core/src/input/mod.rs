//! Platform-neutral host actions and the pointer-delta accumulator.

pub mod accumulator;
pub mod actions;

pub use accumulator::{MouseAccumulator, MouseResidual, PixelStep};
pub use actions::{ActionCategory, HostAction, MouseButton, ScrollAxis, VolumeDirection};
