use glam::Vec2;
use serde::Serialize;
use std::fmt;

/// Vertical advance of the print cursor after each formatted line.
const LINE_HEIGHT: f32 = 20.0;

/// One line of developer text at a screen position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Per-frame buffer of debug text.
///
/// Lines accumulate during update and are drained by
/// [`draw_all`](Self::draw_all) when the frame is drawn.
#[derive(Debug, Clone, Default)]
pub struct DebugText {
    lines: Vec<TextLine>,
    cursor: Vec2,
}

impl DebugText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `text` at an explicit position.
    pub fn print(&mut self, text: impl Into<String>, x: f32, y: f32, scale: f32) {
        self.lines.push(TextLine {
            text: text.into(),
            x,
            y,
            scale,
        });
    }

    /// Move the cursor used by [`printf`](Self::printf).
    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Queue formatted text at the cursor, then move the cursor down a line.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        let Vec2 { x, y } = self.cursor;
        self.print(args.to_string(), x, y, 1.0);
        self.cursor.y += LINE_HEIGHT;
    }

    /// Lines queued so far this frame.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Take every queued line, leaving the buffer empty.
    pub fn draw_all(&mut self) -> Vec<TextLine> {
        std::mem::take(&mut self.lines)
    }
}
