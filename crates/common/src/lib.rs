//! Shared types used across the rig scene crates.

mod types;

pub use types::{SoundHandle, TextureHandle, Transform, VoiceHandle};
