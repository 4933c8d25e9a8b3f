//! The game scene: one `update` then one `draw` per frame.
//!
//! # Invariants
//! - The scene only talks to the engine through the input, audio and frame
//!   sink interfaces.
//! - Rig nodes are updated root-first before any of them is drawn.

mod camera;
mod config;
mod error;
mod rig;
mod scene;

pub use camera::FreeCamera;
pub use config::{CameraConfig, RigConfig, SceneConfig, SpriteConfig};
pub use error::SceneError;
pub use rig::{Humanoid, PartId};
pub use scene::GameScene;
