// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use crate::bitmap::Bitmap;
use crate::config::Color;
use crate::surface::{Paint, Rect, Surface};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Bitmap {
        bitmap: Bitmap,
        left: f32,
        top: f32,
        paint: Paint,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        paint: Paint,
    },
    TextInRect {
        text: String,
        bounds: Rect,
        paint: Paint,
    },
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        paint: Paint,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        paint: Paint,
    },
    Save,
    Restore,
    Rotate {
        degrees: f32,
        px: f32,
        py: f32,
    },
}

impl DrawCommand {
    /// The paint this command draws with, if it draws anything.
    pub fn paint(&self) -> Option<&Paint> {
        match self {
            DrawCommand::Bitmap { paint, .. }
            | DrawCommand::Text { paint, .. }
            | DrawCommand::TextInRect { paint, .. }
            | DrawCommand::Line { paint, .. }
            | DrawCommand::Circle { paint, .. } => Some(paint),
            DrawCommand::Clear(_)
            | DrawCommand::Save
            | DrawCommand::Restore
            | DrawCommand::Rotate { .. } => None,
        }
    }
}

/// A surface that records what is drawn on it so the frame can be inspected
/// or replayed onto another surface later.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => surface.draw_color(*color),
                DrawCommand::Bitmap {
                    bitmap,
                    left,
                    top,
                    paint,
                } => surface.draw_bitmap(bitmap, *left, *top, paint),
                DrawCommand::Text { text, x, y, paint } => surface.draw_text(text, *x, *y, paint),
                DrawCommand::TextInRect {
                    text,
                    bounds,
                    paint,
                } => surface.draw_text_in_rect(text, *bounds, paint),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    paint,
                } => surface.draw_line(*x0, *y0, *x1, *y1, paint),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    paint,
                } => surface.draw_circle(*cx, *cy, *radius, paint),
                DrawCommand::Save => surface.save(),
                DrawCommand::Restore => surface.restore(),
                DrawCommand::Rotate { degrees, px, py } => surface.rotate(*degrees, *px, *py),
            }
        }
    }
}

impl Surface for Scene {
    fn draw_color(&mut self, color: Color) {
        self.add_command(DrawCommand::Clear(color));
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32, paint: &Paint) {
        self.add_command(DrawCommand::Bitmap {
            bitmap: bitmap.clone(),
            left,
            top,
            paint: *paint,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) {
        self.add_command(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            paint: *paint,
        });
    }

    fn draw_text_in_rect(&mut self, text: &str, bounds: Rect, paint: &Paint) {
        self.add_command(DrawCommand::TextInRect {
            text: text.to_string(),
            bounds,
            paint: *paint,
        });
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint) {
        self.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            paint: *paint,
        });
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        self.add_command(DrawCommand::Circle {
            cx,
            cy,
            radius,
            paint: *paint,
        });
    }

    fn save(&mut self) {
        self.add_command(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.add_command(DrawCommand::Restore);
    }

    fn rotate(&mut self, degrees: f32, px: f32, py: f32) {
        self.add_command(DrawCommand::Rotate { degrees, px, py });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_reproduces_the_recording() {
        let paint = Paint::new(Color::WHITE).stroke_width(2.0);
        let mut scene = Scene::new();
        scene.draw_color(Color::BLACK);
        {
            let mut layer = scene.saved();
            layer.rotate(30.0, 5.0, 5.0);
            layer.draw_line(0.0, 0.0, 1.0, 1.0, &paint);
            layer.draw_circle(5.0, 5.0, 2.0, &paint);
        }
        scene.draw_text("12", 1.0, 2.0, &paint);

        let mut copy = Scene::new();
        scene.render(&mut copy);
        assert_eq!(copy.commands(), scene.commands());
        assert_eq!(scene.commands()[1], DrawCommand::Save);
        assert_eq!(scene.commands()[5], DrawCommand::Restore);
    }

    #[test]
    fn only_drawing_commands_carry_paint() {
        let paint = Paint::new(Color::RED);
        let mut scene = Scene::new();
        scene.draw_color(Color::BLACK);
        scene.rotate(1.0, 0.0, 0.0);
        scene.draw_circle(0.0, 0.0, 1.0, &paint);
        let paints: Vec<_> = scene.commands().iter().filter_map(DrawCommand::paint).collect();
        assert_eq!(paints, vec![&paint]);
    }
}
