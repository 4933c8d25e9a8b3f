//! Input: per-frame keyboard polling for the scene.
//!
//! # Invariants
//! - State is sampled once per frame; no buffering or debouncing.
//! - A trigger is "down this frame, up last frame".

pub mod keyboard;
pub mod script;

pub use keyboard::{InputSource, Key, KeyboardState};
pub use script::{InputError, InputScript};
