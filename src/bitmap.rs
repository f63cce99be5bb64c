// ============================================================================
// BITMAPS
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use png::{ColorType, Transformations};

use crate::config::Color;
use crate::error::{Error, Result};

/// Owned RGBA8 image, used for the face background.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Wrap an RGBA8 buffer. The buffer must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::BitmapSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Decode a PNG. Palette, grayscale and 16-bit images come out as RGBA8.
    pub fn decode_png(data: &[u8]) -> Result<Self> {
        let mut decoder = png::Decoder::new(data);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let rgba = match info.color_type {
            ColorType::Rgba => buf,
            ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 0xff])
                .collect(),
            ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 0xff]).collect(),
            other => return Err(Error::UnsupportedImage(other)),
        };
        Self::from_rgba(info.width, info.height, rgba)
    }

    pub fn load_png(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| Error::ImageFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode_png(&data)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let pixels = [color.r, color.g, color.b, color.a]
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Square backdrop shading from `inner` at the center to `outer` at the rim.
    pub fn radial_gradient(size: u32, inner: Color, outer: Color) -> Self {
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
        let half = size as f32 / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let t = if half > 0.0 {
                    ((dx * dx + dy * dy).sqrt() / half).min(1.0)
                } else {
                    0.0
                };
                let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                pixels.extend_from_slice(&[
                    mix(inner.r, outer.r),
                    mix(inner.g, outer.g),
                    mix(inner.b, outer.b),
                    mix(inner.a, outer.a),
                ]);
            }
        }
        Self {
            width: size,
            height: size,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} bitmap",
            self.width,
            self.height
        );
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Resample to `width` x `height` with bilinear filtering.
    pub fn scaled(&self, width: u32, height: u32) -> Bitmap {
        if width == 0 || height == 0 || self.is_empty() {
            return Bitmap {
                width,
                height,
                pixels: vec![0u8; width as usize * height as usize * 4].into(),
            };
        }
        if width == self.width && height == self.height {
            return self.clone();
        }

        let sx = self.width as f32 / width as f32;
        let sy = self.height as f32 / height as f32;
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);

        for y in 0..height {
            let fy = ((y as f32 + 0.5) * sy - 0.5).max(0.0);
            let y0 = (fy.floor() as u32).min(max_y);
            let y1 = (y0 + 1).min(max_y);
            let ty = fy - y0 as f32;
            for x in 0..width {
                let fx = ((x as f32 + 0.5) * sx - 0.5).max(0.0);
                let x0 = (fx.floor() as u32).min(max_x);
                let x1 = (x0 + 1).min(max_x);
                let tx = fx - x0 as f32;

                let (p00, p10) = (self.pixel(x0, y0), self.pixel(x1, y0));
                let (p01, p11) = (self.pixel(x0, y1), self.pixel(x1, y1));
                for c in 0..4 {
                    let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
                    let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
                    pixels.push((top * (1.0 - ty) + bottom * ty).round() as u8);
                }
            }
        }

        Bitmap {
            width,
            height,
            pixels: pixels.into(),
        }
    }
}
