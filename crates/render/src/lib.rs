//! Rendering adapter: renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers never mutate scene state; they receive matrices and handles.
//! - A frame is three passes: background sprites, 3D models, foreground
//!   sprites and debug text. Depth is cleared between the first two.
//! - Model draws arrive in the order the scene submits them (parents before
//!   children); no batching or culling happens here.
//!
//! `FrameRecorder` captures a frame as plain commands so any backend (or a
//! test) can consume it after the scene has drawn.

mod debug_text;
mod renderer;
mod sprite;
mod textures;
mod view;

pub use debug_text::{DebugText, TextLine};
pub use renderer::{DrawCommand, FrameRecorder, FrameSink, Pass};
pub use sprite::Sprite;
pub use textures::TextureRegistry;
pub use view::ViewProjection;
