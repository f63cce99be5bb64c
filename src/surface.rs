// ============================================================================
// DRAWING SURFACE ABSTRACTION
// ============================================================================

use std::ops::{Deref, DerefMut};

use crate::bitmap::Bitmap;
use crate::config::Color;

/// Stroke and fill settings for a single primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub stroke_width: f32,
    pub anti_alias: bool,
    pub text_size: f32,
}

impl Paint {
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            stroke_width: 1.0,
            anti_alias: false,
            text_size: 12.0,
        }
    }

    pub const fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub const fn anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub const fn text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Something the face can be drawn onto.
///
/// Coordinates are y-down. `rotate` turns clockwise (as seen on screen) by
/// `degrees` about `(px, py)` and applies to everything drawn until the
/// matching `restore`.
pub trait Surface {
    /// Fill the whole surface, ignoring the current transform.
    fn draw_color(&mut self, color: Color);

    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32, paint: &Paint);

    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint);

    /// Draw `text` centered inside `bounds`.
    fn draw_text_in_rect(&mut self, text: &str, bounds: Rect, paint: &Paint);

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint);

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint);

    fn save(&mut self);

    fn restore(&mut self);

    fn rotate(&mut self, degrees: f32, px: f32, py: f32);

    /// Save now and restore when the returned guard goes out of scope.
    fn saved(&mut self) -> SavedLayer<'_, Self>
    where
        Self: Sized,
    {
        SavedLayer::new(self)
    }
}

/// Scoped save/restore pair. Derefs to the wrapped surface.
pub struct SavedLayer<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SavedLayer<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SavedLayer<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedLayer<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedLayer<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

// ============================================================================
// AFFINE TRANSFORM
// ============================================================================

/// 2D affine map `(x, y) -> (a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Clockwise rotation on a y-down surface about `(px, py)`.
    pub fn rotation_about(degrees: f32, px: f32, py: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: px - cos * px + sin * py,
            ty: py - sin * px - cos * py,
        }
    }

    /// `self` applied after `inner`.
    pub fn concat(&self, inner: &Transform) -> Transform {
        Transform {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            tx: self.a * inner.tx + self.c * inner.ty + self.tx,
            ty: self.b * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }
}
