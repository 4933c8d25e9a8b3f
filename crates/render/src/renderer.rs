use crate::debug_text::TextLine;
use crate::sprite::Sprite;
use crate::view::ViewProjection;
use glam::{Mat4, Vec2};
use rigscene_common::TextureHandle;
use serde::Serialize;
use std::fmt;

/// The three passes of a frame, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pass {
    Background,
    Model,
    Foreground,
}

/// Renderer-facing side of a frame. All backends implement this trait.
///
/// The scene pushes matrices and handles through it; a sink never reaches
/// back into scene state.
pub trait FrameSink {
    fn begin_pass(&mut self, pass: Pass);

    fn end_pass(&mut self);

    /// Clear the depth buffer between the background and model passes.
    fn clear_depth(&mut self);

    /// Draw one model with the given world matrix.
    fn draw_model(&mut self, world: &Mat4, camera: &ViewProjection, texture: TextureHandle);

    fn draw_sprite(&mut self, sprite: &Sprite);

    fn draw_text(&mut self, lines: Vec<TextLine>);
}

/// One recorded draw operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    BeginPass(Pass),
    EndPass(Pass),
    ClearDepth,
    Model {
        world: Mat4,
        view_projection: Mat4,
        texture: TextureHandle,
    },
    Sprite {
        texture: TextureHandle,
        position: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Text(Vec<TextLine>),
}

/// Frame sink that records commands for a backend or a test to consume.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
    pass: Option<Pass>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded frame and start a fresh one.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        self.pass = None;
        std::mem::take(&mut self.commands)
    }

    /// World matrices and textures of every model draw, in submission order.
    pub fn models(&self) -> impl Iterator<Item = (&Mat4, TextureHandle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Model { world, texture, .. } => Some((world, *texture)),
            _ => None,
        })
    }

    /// Every text line drawn this frame.
    pub fn text(&self) -> impl Iterator<Item = &TextLine> {
        self.commands.iter().flat_map(|c| match c {
            DrawCommand::Text(lines) => lines.as_slice(),
            _ => &[][..],
        })
    }

    fn expect_pass(&self, wanted: &[Pass], what: &str) {
        if !self.pass.is_some_and(|p| wanted.contains(&p)) {
            tracing::warn!(pass = ?self.pass, what, "draw outside its pass");
        }
    }
}

impl FrameSink for FrameRecorder {
    fn begin_pass(&mut self, pass: Pass) {
        if let Some(open) = self.pass {
            tracing::warn!(?open, ?pass, "pass begun while another is open");
        }
        self.pass = Some(pass);
        self.commands.push(DrawCommand::BeginPass(pass));
    }

    fn end_pass(&mut self) {
        match self.pass.take() {
            Some(pass) => self.commands.push(DrawCommand::EndPass(pass)),
            None => tracing::warn!("end_pass without an open pass"),
        }
    }

    fn clear_depth(&mut self) {
        self.commands.push(DrawCommand::ClearDepth);
    }

    fn draw_model(&mut self, world: &Mat4, camera: &ViewProjection, texture: TextureHandle) {
        self.expect_pass(&[Pass::Model], "model");
        self.commands.push(DrawCommand::Model {
            world: *world,
            view_projection: camera.view_projection(),
            texture,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.expect_pass(&[Pass::Background, Pass::Foreground], "sprite");
        self.commands.push(DrawCommand::Sprite {
            texture: sprite.texture,
            position: sprite.position(),
            size: sprite.size,
            color: sprite.color,
        });
    }

    fn draw_text(&mut self, lines: Vec<TextLine>) {
        self.expect_pass(&[Pass::Foreground], "text");
        self.commands.push(DrawCommand::Text(lines));
    }
}

/// Human-readable frame log, one command per line.
impl fmt::Display for FrameRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match command {
                DrawCommand::BeginPass(pass) => writeln!(f, "begin {pass:?}")?,
                DrawCommand::EndPass(pass) => writeln!(f, "end {pass:?}")?,
                DrawCommand::ClearDepth => writeln!(f, "  clear depth")?,
                DrawCommand::Model { world, texture, .. } => {
                    let p = world.w_axis;
                    writeln!(
                        f,
                        "  model tex={} origin=({:.2}, {:.2}, {:.2})",
                        texture.0, p.x, p.y, p.z
                    )?;
                }
                DrawCommand::Sprite {
                    texture, position, ..
                } => writeln!(
                    f,
                    "  sprite tex={} pos=({:.1}, {:.1})",
                    texture.0, position.x, position.y
                )?,
                DrawCommand::Text(lines) => {
                    for line in lines {
                        writeln!(f, "  text ({:.0}, {:.0}) {}", line.x, line.y, line.text)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn records_passes_in_order() {
        let mut rec = FrameRecorder::new();
        let camera = ViewProjection::default();
        rec.begin_pass(Pass::Background);
        rec.end_pass();
        rec.clear_depth();
        rec.begin_pass(Pass::Model);
        rec.draw_model(&Mat4::IDENTITY, &camera, TextureHandle(0));
        rec.end_pass();

        assert_eq!(
            rec.commands()[..3],
            [
                DrawCommand::BeginPass(Pass::Background),
                DrawCommand::EndPass(Pass::Background),
                DrawCommand::ClearDepth,
            ]
        );
        assert_eq!(rec.models().count(), 1);
        assert_eq!(rec.commands().last(), Some(&DrawCommand::EndPass(Pass::Model)));
    }

    #[test]
    fn model_draws_keep_submission_order() {
        let mut rec = FrameRecorder::new();
        let camera = ViewProjection::default();
        rec.begin_pass(Pass::Model);
        for y in [4.5, 8.0, 1.0] {
            let world = Mat4::from_translation(Vec3::new(0.0, y, 0.0));
            rec.draw_model(&world, &camera, TextureHandle(0));
        }
        rec.end_pass();
        let ys: Vec<f32> = rec.models().map(|(m, _)| m.w_axis.y).collect();
        assert_eq!(ys, vec![4.5, 8.0, 1.0]);
    }

    #[test]
    fn text_and_sprites_are_logged() {
        let mut rec = FrameRecorder::new();
        rec.begin_pass(Pass::Foreground);
        rec.draw_sprite(&Sprite::new(TextureHandle(1), Vec2::new(100.0, 50.0)));
        rec.draw_text(vec![TextLine {
            text: "Value:1".into(),
            x: 50.0,
            y: 90.0,
            scale: 1.0,
        }]);
        rec.end_pass();

        assert_eq!(rec.text().count(), 1);
        let log = rec.to_string();
        assert!(log.contains("sprite tex=1 pos=(100.0, 50.0)"));
        assert!(log.contains("text (50, 90) Value:1"));
    }

    #[test]
    fn take_resets_frame() {
        let mut rec = FrameRecorder::new();
        rec.clear_depth();
        assert_eq!(rec.take().len(), 1);
        assert!(rec.commands().is_empty());
    }
}
