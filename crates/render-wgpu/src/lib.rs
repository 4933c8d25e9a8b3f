//! wgpu render backend for the rig scene.
//!
//! Consumes a recorded frame: every model draw becomes one instance of a
//! shaded cube placed by its world matrix, over a grid floor.
//!
//! # Invariants
//! - The backend never sees scene state, only recorded commands.
//! - Instances are uploaded in submission order.

mod gpu;
mod shaders;

pub use gpu::{WgpuRenderer, texture_color};
