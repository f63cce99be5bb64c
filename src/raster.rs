// ============================================================================
// PIXEL CANVAS
// ============================================================================

use std::path::Path;

use log::warn;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::bitmap::Bitmap;
use crate::config::Color;
use crate::error::{Error, Result};
use crate::surface::{Paint, Rect, Surface, Transform};

pub fn load_font(data: Vec<u8>) -> Result<Font<'static>> {
    Font::try_from_vec(data).ok_or(Error::InvalidFont)
}

/// Read a TrueType/OpenType file and check that it parses.
pub fn read_font_data(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|source| Error::FontFile {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_bytes(&data).ok_or(Error::InvalidFont)?;
    Ok(data)
}

/// RGBA8 frame buffer with a transform stack.
///
/// Lines and circles follow the current rotation. Text and bitmaps are
/// placed at their transformed anchor but stay axis-aligned.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
    transform: Transform,
    stack: Vec<Transform>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
            transform: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} frame",
            self.width,
            self.height
        );
        let idx = (y * self.width + x) * 4;
        [
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
            self.frame[idx + 3],
        ]
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        set_pixel(
            self.frame,
            self.width,
            self.height,
            x as usize,
            y as usize,
            color,
            coverage,
        );
    }
}

impl Surface for Canvas<'_> {
    fn draw_color(&mut self, color: Color) {
        self.clear(color);
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32, paint: &Paint) {
        let (ox, oy) = self.transform.map_point(left, top);
        let (ox, oy) = (ox.round() as i32, oy.round() as i32);
        let opacity = paint.color.alpha();
        for by in 0..bitmap.height() {
            for bx in 0..bitmap.width() {
                let [r, g, b, a] = bitmap.pixel(bx, by);
                let coverage = a as f32 / 255.0 * opacity;
                if coverage > 0.0 {
                    self.blend(
                        ox + bx as i32,
                        oy + by as i32,
                        Color::new(r, g, b),
                        coverage,
                    );
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) {
        let Some(font) = self.font else {
            return;
        };
        let (x, y) = self.transform.map_point(x, y);
        draw_text(
            self.frame,
            self.width,
            self.height,
            x,
            y,
            text,
            font,
            Scale::uniform(paint.text_size),
            paint,
        );
    }

    fn draw_text_in_rect(&mut self, text: &str, bounds: Rect, paint: &Paint) {
        let Some(font) = self.font else {
            return;
        };
        let scale = Scale::uniform(paint.text_size);
        let v_metrics = font.v_metrics(scale);
        let text_width = calculate_text_width(text, font, scale) as f32;
        let x = bounds.left + (bounds.width() - text_width) / 2.0;
        let y = bounds.top + (bounds.height() + v_metrics.ascent + v_metrics.descent) / 2.0;
        self.draw_text(text, x, y, paint);
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint) {
        let (x0, y0) = self.transform.map_point(x0, y0);
        let (x1, y1) = self.transform.map_point(x1, y1);
        draw_thick_line(
            self.frame,
            self.width,
            self.height,
            x0,
            y0,
            x1,
            y1,
            paint,
        );
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        let (cx, cy) = self.transform.map_point(cx, cy);
        draw_circle(self.frame, self.width, self.height, cx, cy, radius, paint);
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.transform = transform,
            None => warn!("restore called without a matching save"),
        }
    }

    fn rotate(&mut self, degrees: f32, px: f32, py: f32) {
        self.transform = self
            .transform
            .concat(&Transform::rotation_about(degrees, px, py));
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Hard-edged strokes snap partial coverage to fully on or off.
fn coverage_for(paint: &Paint, coverage: f32) -> f32 {
    if paint.anti_alias {
        coverage
    } else if coverage >= 0.5 {
        1.0
    } else {
        0.0
    }
}

fn set_pixel(
    frame: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    color: Color,
    coverage: f32,
) {
    let idx = (y * width + x) * 4;
    if x < width && y < height && idx + 4 <= frame.len() {
        let a = (color.alpha() * coverage).clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        let dst = [frame[idx] as f32, frame[idx + 1] as f32, frame[idx + 2] as f32];
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_thick_line(
    frame: &mut [u8],
    width: usize,
    height: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    paint: &Paint,
) {
    let thickness = paint.stroke_width.max(1.0);
    let pad = thickness.ceil() + 1.0;
    let min_x = (x0.min(x1) - pad).floor().max(0.0) as i32;
    let max_x = (x0.max(x1) + pad).ceil().min(width as f32) as i32;
    let min_y = (y0.min(y1) - pad).floor().max(0.0) as i32;
    let max_y = (y0.max(y1) + pad).ceil().min(height as f32) as i32;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let px = x as f32 + 0.5 - x0;
            let py = y as f32 + 0.5 - y0;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = ((lx - x as f32 - 0.5).powi(2) + (ly - y as f32 - 0.5).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            let coverage = coverage_for(paint, aa);
            if coverage > 0.01 {
                set_pixel(frame, width, height, x as usize, y as usize, paint.color, coverage);
            }
        }
    }
}

fn draw_circle(
    frame: &mut [u8],
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    paint: &Paint,
) {
    let min_x = (cx - radius - 1.0).floor().max(0.0) as i32;
    let max_x = (cx + radius + 1.0).ceil().min(width as f32) as i32;
    let min_y = (cy - radius - 1.0).floor().max(0.0) as i32;
    let max_y = (cy + radius + 1.0).ceil().min(height as f32) as i32;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let dist = ((x as f32 + 0.5 - cx).powi(2) + (y as f32 + 0.5 - cy).powi(2)).sqrt();
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            let coverage = coverage_for(paint, aa);
            if coverage > 0.0 {
                set_pixel(frame, width, height, x as usize, y as usize, paint.color, coverage);
            }
        }
    }
}

fn calculate_text_width(text: &str, font: &Font, scale: Scale) -> i32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let (min_x, max_x) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold((i32::MAX, i32::MIN), |(min_x, max_x), bb| {
            (min_x.min(bb.min.x), max_x.max(bb.max.x))
        });
    if min_x < max_x {
        max_x - min_x
    } else {
        0
    }
}

/// Lays `text` out left-aligned on the baseline through `(x, y)`.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    frame: &mut [u8],
    width: usize,
    height: usize,
    x: f32,
    y: f32,
    text: &str,
    font: &Font,
    scale: Scale,
    paint: &Paint,
) {
    for glyph in font.layout(text, scale, point(x, y)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                let coverage = coverage_for(paint, v);
                if px >= 0 && py >= 0 && coverage > 0.0 {
                    set_pixel(
                        frame,
                        width,
                        height,
                        px as usize,
                        py as usize,
                        paint.color,
                        coverage,
                    );
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: usize, h: usize) -> Vec<u8> {
        vec![0; w * h * 4]
    }

    fn lit(canvas: &Canvas, x: usize, y: usize) -> bool {
        canvas.pixel(x, y)[0] > 0
    }

    #[test]
    fn draw_color_fills_every_pixel() {
        let mut buf = frame(4, 3);
        let mut canvas = Canvas::new(&mut buf, 4, 3);
        canvas.draw_color(Color::new(1, 2, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), [1, 2, 3, 0xff]);
            }
        }
    }

    #[test]
    fn rotation_turns_a_vertical_hand_horizontal() {
        let mut buf = frame(41, 41);
        let mut canvas = Canvas::new(&mut buf, 41, 41);
        let paint = Paint::new(Color::WHITE).stroke_width(1.0);
        canvas.save();
        canvas.rotate(90.0, 20.5, 20.5);
        canvas.draw_line(20.5, 20.5, 20.5, 2.5, &paint);
        canvas.restore();
        assert!(lit(&canvas, 30, 20));
        assert!(!lit(&canvas, 20, 10));
        assert_eq!(canvas.transform(), Transform::IDENTITY);
    }

    #[test]
    fn hard_edges_only_write_full_coverage() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        let paint = Paint::new(Color::WHITE).anti_alias(false);
        canvas.draw_circle(10.0, 10.0, 5.3, &paint);
        canvas.draw_line(0.0, 0.0, 19.0, 13.0, &paint.stroke_width(2.0));
        for y in 0..20 {
            for x in 0..20 {
                let v = canvas.pixel(x, y)[0];
                assert!(v == 0 || v == 0xff, "partial pixel at {x},{y}: {v}");
            }
        }
    }

    #[test]
    fn anti_aliased_circle_has_soft_rim() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        let paint = Paint::new(Color::WHITE).anti_alias(true);
        canvas.draw_circle(10.0, 10.0, 5.3, &paint);
        let partial = (0..20)
            .flat_map(|y| (0..20).map(move |x| (x, y)))
            .any(|(x, y)| {
                let v = canvas.pixel(x, y)[0];
                v > 0 && v < 0xff
            });
        assert!(partial);
        assert_eq!(canvas.pixel(10, 10)[0], 0xff);
    }

    #[test]
    fn out_of_bounds_geometry_is_clipped() {
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        let paint = Paint::new(Color::WHITE).stroke_width(3.0);
        canvas.draw_line(-50.0, -50.0, -10.0, -400.0, &paint);
        canvas.draw_circle(100.0, 100.0, 20.0, &paint);
        canvas.draw_line(5.0, 5.0, 5.0, 5.0, &paint);
        assert!(lit(&canvas, 5, 5));
        assert!(!lit(&canvas, 0, 9));
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut buf = frame(2, 2);
        let mut canvas = Canvas::new(&mut buf, 2, 2);
        canvas.rotate(45.0, 1.0, 1.0);
        canvas.restore();
        assert_ne!(canvas.transform(), Transform::IDENTITY);
    }

    #[test]
    #[should_panic]
    fn reading_outside_the_frame_panics() {
        let mut buf = frame(3, 3);
        let canvas = Canvas::new(&mut buf, 3, 3);
        canvas.pixel(3, 0);
    }

    #[test]
    fn bitmap_is_blitted_at_its_origin() {
        let mut buf = frame(6, 6);
        let mut canvas = Canvas::new(&mut buf, 6, 6);
        let bitmap = Bitmap::filled(2, 2, Color::new(0xff, 0, 0));
        canvas.draw_bitmap(&bitmap, 3.0, 1.0, &Paint::new(Color::BLACK));
        assert_eq!(canvas.pixel(3, 1), [0xff, 0, 0, 0xff]);
        assert_eq!(canvas.pixel(4, 2), [0xff, 0, 0, 0xff]);
        assert_eq!(canvas.pixel(2, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn text_without_a_font_is_skipped() {
        let mut buf = frame(8, 8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        canvas.draw_text("12", 0.0, 7.0, &Paint::new(Color::WHITE).text_size(8.0));
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        assert!(matches!(load_font(vec![1, 2, 3]), Err(Error::InvalidFont)));
    }
}
