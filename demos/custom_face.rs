use std::path::Path;

use rand::Rng;
use watchface::host::{self, HostOptions};
use watchface::raster::read_font_data;
use watchface::{Bitmap, Color, FaceConfig, LabelPlacement};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // A different second-hand accent every run
    let mut rng = rand::rng();
    let accent = Color::new(
        rng.random_range(0x80..=0xff),
        rng.random_range(0x20..0x80),
        rng.random_range(0x00..0x60),
    );

    let font = std::env::var_os("WATCHFACE_FONT")
        .map(|path| read_font_data(Path::new(&path)))
        .transpose()?;

    // Build a slimmer face with the bon-generated builder
    let config = FaceConfig::builder()
        .title("Custom Watch Face".to_string())
        .window_width(360)
        .window_height(360)
        .hand_stroke_width(4.0)
        .second_hand_stroke_width(2.0)
        .major_tick_length(24.0)
        .minor_tick_length(8.0)
        .minor_ticks_per_interval(2)
        .hub_radius(9.0)
        .hub_ring_radius(4.0)
        .second_hand_color(accent)
        .label_placement(LabelPlacement::Dial)
        .label_color(Color::new(0xc0, 0xc0, 0xc0))
        .background(Bitmap::radial_gradient(
            360,
            Color::new(0x10, 0x28, 0x30),
            Color::BLACK,
        ))
        .maybe_font_data(font)
        .build();

    println!("Displaying a custom analog face:");
    println!("- 36 tick marks, labels around the dial");
    println!("- Press 'a' to toggle ambient mode, Escape to quit");

    host::run(config, HostOptions::default())?;
    Ok(())
}
