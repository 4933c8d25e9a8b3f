//! Audio: device-agnostic interface for loading and playing wave data.
//!
//! # Invariants
//! - Sounds are loaded once per name; loading again returns the same handle.
//! - Voice handles are never reused within a device.
//! - Stopping a voice that already ended is a no-op.

mod device;

pub use device::{Audio, AudioError, SilentAudio};
