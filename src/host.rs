// ============================================================================
// DESKTOP HOST
// ============================================================================

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::clock::{SystemClock, TimeSource};
use crate::config::FaceConfig;
use crate::engine::WatchFaceEngine;
use crate::error::Result;
use crate::raster::{load_font, Canvas};
use crate::scene::Scene;
use crate::surface::Rect;
use crate::timezone::TimeZoneWatcher;

const MINUTE_MS: u64 = 60_000;

/// Start-up options that are not part of the face itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostOptions {
    pub start_ambient: bool,
}

/// First wall-clock minute boundary strictly after `now_ms`.
fn next_minute(now_ms: u64) -> u64 {
    (now_ms / MINUTE_MS + 1) * MINUTE_MS
}

/// Translate a wall-clock deadline into an `Instant` for the event loop.
fn instant_for(deadline_ms: u64, now_ms: u64) -> Instant {
    Instant::now() + Duration::from_millis(deadline_ms.saturating_sub(now_ms))
}

/// Open a window and run the face in it until it is closed.
///
/// Keys: `a` toggles ambient mode, `Escape` quits. Occluding the window
/// makes the face invisible.
pub fn run(mut config: FaceConfig, options: HostOptions) -> Result<()> {
    let font: Option<Font<'static>> = match config.font_data.take() {
        Some(data) => Some(load_font(data)?),
        None => {
            warn!("no font configured, labels will not be drawn");
            None
        }
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .build(&event_loop)?;

    let window = std::sync::Arc::new(window);
    let window_clone = window.clone();

    let size = window.inner_size();
    let mut fb_width = size.width;
    let mut fb_height = size.height;
    let surface_texture = SurfaceTexture::new(size.width.max(1), size.height.max(1), &window);
    let mut pixels = Pixels::new(size.width.max(1), size.height.max(1), surface_texture)?;

    let mut engine = WatchFaceEngine::new(config, SystemClock);
    engine.on_create();
    engine.on_surface_changed(fb_width, fb_height);
    engine.on_visibility_changed(true);
    if options.start_ambient {
        engine.on_ambient_mode_changed(true);
    }

    let mut scene = Scene::new();
    let mut zone_watcher = TimeZoneWatcher::new(engine.time_source().system_offset());
    let mut minute_due = next_minute(engine.time_source().now_millis());

    info!("window {}x{} ready", fb_width, fb_height);

    event_loop.run(move |event, window_target| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                engine.on_destroy();
                window_target.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Key::Character("a") = logical_key.as_ref() {
                    let ambient = !engine.state().ambient;
                    engine.on_ambient_mode_changed(ambient);
                }
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    match pixels.resize_buffer(new_size.width, new_size.height) {
                        Ok(()) => {
                            fb_width = new_size.width;
                            fb_height = new_size.height;
                        }
                        Err(err) => warn!("could not resize pixel buffer: {}", err),
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        warn!("could not resize surface: {}", err);
                    }
                } else {
                    fb_width = 0;
                    fb_height = 0;
                }
                engine.on_surface_changed(new_size.width, new_size.height);
                window_clone.request_redraw();
            }
            WindowEvent::Occluded(occluded) => {
                engine.on_visibility_changed(!occluded);
            }
            WindowEvent::RedrawRequested => {
                if fb_width == 0 || fb_height == 0 {
                    return;
                }
                scene.clear();
                engine.on_draw(&mut scene, Rect::from_size(fb_width, fb_height));

                let frame = pixels.frame_mut();
                let mut canvas = Canvas::new(frame, fb_width as usize, fb_height as usize)
                    .with_font(font.as_ref());
                scene.render(&mut canvas);
                if let Err(err) = pixels.render() {
                    error!("presenting frame failed: {}", err);
                    engine.on_destroy();
                    window_target.exit();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            engine.poll_timer();

            let now_ms = engine.time_source().now_millis();
            if now_ms >= minute_due {
                engine.on_time_tick();
                minute_due = next_minute(now_ms);
            }

            if zone_watcher.poll(engine.time_source().system_offset())
                && engine.is_observing_time_zone()
            {
                debug!("system time zone changed");
                engine.on_time_zone_changed();
            }

            if engine.take_redraw_request() {
                window_clone.request_redraw();
            }

            let wake_ms = match engine.next_timer_deadline() {
                Some((_, due_ms)) => due_ms.min(minute_due),
                None => minute_due,
            };
            window_target.set_control_flow(ControlFlow::WaitUntil(instant_for(wake_ms, now_ms)));
        }
        _ => {}
    })?;

    Ok(())
}
