//! An analog watch face.
//!
//! [`WatchFaceEngine`] receives lifecycle callbacks (surface size, visibility,
//! ambient mode, time ticks, time-zone changes, timer wake-ups) and draws the
//! face onto anything implementing [`Surface`]. In interactive mode it keeps
//! a redraw timer aligned to whole seconds so the second hand sweeps; in
//! ambient mode the timer stops and the second hand disappears.
//!
//! [`host::run`] puts the engine in a desktop window.
//!
//! ```no_run
//! use watchface::{host, FaceConfig, LabelPlacement};
//!
//! let config = FaceConfig::builder()
//!     .label_placement(LabelPlacement::Dial)
//!     .build();
//! host::run(config, host::HostOptions::default())?;
//! # Ok::<(), watchface::Error>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod bitmap;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod surface;
pub mod timezone;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use bitmap::Bitmap;
pub use clock::{Calendar, ClockSample, HandAngles, SystemClock, TimeSource, Zone};
pub use config::{BoxedLabel, Color, FaceConfig, LabelPlacement};
pub use engine::WatchFaceEngine;
pub use error::{Error, Result};
pub use raster::Canvas;
pub use renderer::{render_face, Paints};
pub use scene::{DrawCommand, Scene};
pub use scheduler::{FireOutcome, RedrawScheduler, TimerState, TimerToken};
pub use state::RenderState;
pub use surface::{Paint, Rect, SavedLayer, Surface, Transform};
