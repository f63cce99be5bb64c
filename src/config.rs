// ============================================================================
// FACE CONFIGURATION
// ============================================================================

use bon::Builder;

use crate::bitmap::Bitmap;
use crate::clock::Zone;

/// RGBA color used by paints and fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Build a color from a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// Where the cardinal digit labels are placed.
///
/// `Legacy` reproduces the face exactly as it has always been drawn: the "6"
/// and "9" sit at negative coordinates (off-canvas) and the "12" is drawn
/// near the bottom edge. `Dial` puts each digit at its conventional position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPlacement {
    #[default]
    Legacy,
    Dial,
}

/// Text drawn inside a fixed rectangle, on top of the cardinal labels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxedLabel {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for BoxedLabel {
    fn default() -> Self {
        Self {
            text: "12".to_string(),
            left: 100.0,
            top: 100.0,
            right: 150.0,
            bottom: 150.0,
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct FaceConfig {
    // Window configuration
    #[builder(default = "Analog Watch Face".to_string())]
    pub title: String,
    #[builder(default = 400)]
    pub window_width: u32,
    #[builder(default = 400)]
    pub window_height: u32,

    // Time keeping
    #[builder(default = 1000)]
    pub interactive_update_rate_ms: u64,
    #[builder(default)]
    pub zone: Zone,

    // Hand geometry, as fractions of half the surface width
    #[builder(default = 0.5)]
    pub hour_hand_fraction: f32,
    #[builder(default = 0.7)]
    pub minute_hand_fraction: f32,
    #[builder(default = 0.9)]
    pub second_hand_fraction: f32,

    // Strokes
    #[builder(default = 7.0)]
    pub hand_stroke_width: f32,
    #[builder(default = 3.0)]
    pub second_hand_stroke_width: f32,
    #[builder(default = 1.0)]
    pub minor_tick_stroke_width: f32,

    // Hub circles
    #[builder(default = 13.0)]
    pub hub_radius: f32,
    #[builder(default = 7.0)]
    pub hub_ring_radius: f32,
    #[builder(default = 8.0)]
    pub second_hub_radius: f32,
    #[builder(default = 4.0)]
    pub second_hub_ring_radius: f32,

    // Tick configuration
    #[builder(default = 12)]
    pub major_ticks: usize,
    #[builder(default = 4)]
    pub minor_ticks_per_interval: usize,
    #[builder(default = 16.0)]
    pub major_tick_length: f32,
    #[builder(default = 3.0)]
    pub minor_tick_length: f32,

    // Labels
    #[builder(default = 22.0)]
    pub label_text_size: f32,
    #[builder(default = 20.0)]
    pub label_edge_offset: f32,
    #[builder(default)]
    pub label_placement: LabelPlacement,
    pub boxed_label: Option<BoxedLabel>,

    // Colors
    #[builder(default = Color::BLACK)]
    pub background_color: Color,
    #[builder(default = Color::WHITE)]
    pub hand_color: Color,
    #[builder(default = Color::RED)]
    pub second_hand_color: Color,
    #[builder(default = Color::WHITE)]
    pub tick_color: Color,
    #[builder(default = Color::from_argb(0x7f0f_0024))]
    pub label_color: Color,

    // Assets
    pub font_data: Option<Vec<u8>>,
    pub background: Option<Bitmap>,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
