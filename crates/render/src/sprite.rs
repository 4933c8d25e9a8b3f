use glam::Vec2;
use rigscene_common::TextureHandle;

/// A screen-space textured quad, positioned by its top-left corner in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureHandle,
    position: Vec2,
    pub size: Vec2,
    pub color: [f32; 4],
}

impl Sprite {
    pub fn new(texture: TextureHandle, position: Vec2) -> Self {
        Self {
            texture,
            position,
            size: Vec2::splat(64.0),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}
