use std::env;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use clap::{Parser, ValueEnum};
use log::{info, warn};

use watchface::host::{self, HostOptions};
use watchface::raster::read_font_data;
use watchface::{Bitmap, BoxedLabel, Color, FaceConfig, LabelPlacement, Zone};

/// Fonts tried, in order, when neither `--font` nor `WATCHFACE_FONT` is set.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Labels {
    /// Cardinal labels exactly where the classic face put them
    Legacy,
    /// Cardinal labels laid out around the dial
    Dial,
}

impl From<Labels> for LabelPlacement {
    fn from(labels: Labels) -> Self {
        match labels {
            Labels::Legacy => LabelPlacement::Legacy,
            Labels::Dial => LabelPlacement::Dial,
        }
    }
}

/// Analog watch face in a desktop window. Press `a` to toggle ambient mode.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Window width in logical pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// TrueType font for the labels (defaults to $WATCHFACE_FONT, then system fonts)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Where the 3/6/9/12 labels go
    #[arg(long, value_enum, default_value_t = Labels::Legacy)]
    labels: Labels,

    /// Start in ambient mode
    #[arg(long)]
    ambient: bool,

    /// Also draw the "12" label centred in its fixed box
    #[arg(long)]
    boxed_label: bool,

    /// PNG image to draw behind the face, scaled to the window width
    #[arg(long, value_name = "PATH")]
    background: Option<PathBuf>,

    /// Solid background instead of the gradient image
    #[arg(long, conflicts_with = "background")]
    plain: bool,

    /// Fixed UTC offset such as +05:30 instead of the system time zone
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<FixedOffset>,
}

fn resolve_font(explicit: Option<PathBuf>) -> Result<Option<Vec<u8>>, watchface::Error> {
    if let Some(path) = explicit.or_else(|| env::var_os("WATCHFACE_FONT").map(PathBuf::from)) {
        info!("using font {}", path.display());
        return read_font_data(&path).map(Some);
    }
    for candidate in SYSTEM_FONTS.iter().map(Path::new) {
        if let Ok(data) = read_font_data(candidate) {
            info!("using system font {}", candidate.display());
            return Ok(Some(data));
        }
    }
    warn!("no usable system font found");
    Ok(None)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let background = match (&args.background, args.plain) {
        (Some(path), _) => {
            let bitmap = Bitmap::load_png(path)?;
            info!(
                "background {} ({}x{})",
                path.display(),
                bitmap.width(),
                bitmap.height()
            );
            Some(bitmap)
        }
        (None, true) => None,
        (None, false) => Some(Bitmap::radial_gradient(
            512,
            Color::new(0x30, 0x30, 0x48),
            Color::BLACK,
        )),
    };

    let config = FaceConfig::builder()
        .window_width(args.width)
        .window_height(args.height)
        .label_placement(args.labels.into())
        .zone(args.utc_offset.map_or(Zone::System, Zone::Fixed))
        .maybe_boxed_label(args.boxed_label.then(BoxedLabel::default))
        .maybe_font_data(resolve_font(args.font)?)
        .maybe_background(background)
        .build();

    host::run(
        config,
        HostOptions {
            start_ambient: args.ambient,
        },
    )?;
    Ok(())
}
