// ============================================================================
// RENDERING
// ============================================================================

use crate::bitmap::Bitmap;
use crate::clock::ClockSample;
use crate::config::{FaceConfig, LabelPlacement};
use crate::state::RenderState;
use crate::surface::{Paint, Rect, SavedLayer, Surface};

/// Every paint the face draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paints {
    pub background: Paint,
    pub hand: Paint,
    pub second_hand: Paint,
    pub minor_tick: Paint,
    pub label: Paint,
}

impl Paints {
    pub fn new(config: &FaceConfig, ambient: bool) -> Self {
        let mut paints = Self {
            background: Paint::new(config.background_color),
            hand: Paint::new(config.hand_color).stroke_width(config.hand_stroke_width),
            second_hand: Paint::new(config.second_hand_color)
                .stroke_width(config.second_hand_stroke_width),
            minor_tick: Paint::new(config.tick_color).stroke_width(config.minor_tick_stroke_width),
            label: Paint::new(config.label_color).text_size(config.label_text_size),
        };
        paints.set_ambient(ambient);
        paints
    }

    /// Ambient displays get hard-edged strokes everywhere.
    pub fn set_ambient(&mut self, ambient: bool) {
        for paint in [
            &mut self.background,
            &mut self.hand,
            &mut self.second_hand,
            &mut self.minor_tick,
            &mut self.label,
        ] {
            paint.anti_alias = !ambient;
        }
    }
}

/// Rotation between consecutive tick marks, spreading all ticks over 360°.
pub fn tick_step_degrees(config: &FaceConfig) -> f32 {
    let total = config.major_ticks * (config.minor_ticks_per_interval + 1);
    if total == 0 {
        0.0
    } else {
        360.0 / total as f32
    }
}

/// Text and baseline origin of the four cardinal labels plus the center label.
pub fn label_positions(state: &RenderState, config: &FaceConfig) -> [(&'static str, f32, f32); 5] {
    let (w, h) = (state.width as f32, state.height as f32);
    let (cx, cy) = (state.center_x, state.center_y);
    let offset = config.label_edge_offset;
    match config.label_placement {
        LabelPlacement::Legacy => [
            ("3", w - offset, cy),
            ("6", cx, -h + offset),
            ("9", -w + offset, cy),
            ("12", cx, h - offset),
            ("12", cx, cy),
        ],
        LabelPlacement::Dial => [
            ("3", w - offset, cy),
            ("6", cx, h - offset),
            ("9", offset, cy),
            ("12", cx, offset + config.label_text_size),
            ("12", cx, cy),
        ],
    }
}

/// Draw one complete frame of the face for `sample`.
///
/// Later strokes cover earlier ones at the pivot, so the order is fixed:
/// background, labels, ticks, hour hand, minute hand and hub, then the
/// second hand and its hub when interactive.
pub fn render_face<S: Surface + ?Sized>(
    surface: &mut S,
    sample: &ClockSample,
    state: &RenderState,
    paints: &Paints,
    background: Option<&Bitmap>,
    config: &FaceConfig,
) {
    surface.draw_color(config.background_color);
    if let Some(bitmap) = background {
        surface.draw_bitmap(bitmap, 0.0, 0.0, &paints.background);
    }

    for (text, x, y) in label_positions(state, config) {
        surface.draw_text(text, x, y, &paints.label);
    }
    if let Some(boxed) = &config.boxed_label {
        let bounds = Rect::new(boxed.left, boxed.top, boxed.right, boxed.bottom);
        surface.draw_text_in_rect(&boxed.text, bounds, &paints.label);
    }

    let angles = sample.hand_angles();
    let (cx, cy) = (state.center_x, state.center_y);

    let mut layer = SavedLayer::new(surface);

    add_ticks(&mut *layer, state, paints, config);

    layer.rotate(angles.hours, cx, cy);
    layer.draw_line(cx, cy, cx, cy - state.hour_hand_length, &paints.hand);

    layer.rotate(angles.minutes - angles.hours, cx, cy);
    layer.draw_line(cx, cy, cx, cy - state.minute_hand_length, &paints.hand);
    layer.draw_circle(cx, cy, config.hub_radius, &paints.hand);
    layer.draw_circle(cx, cy, config.hub_ring_radius, &paints.background);

    if !state.ambient {
        layer.rotate(angles.seconds - angles.minutes, cx, cy);
        layer.draw_line(cx, cy, cx, cy - state.second_hand_length, &paints.second_hand);
        layer.draw_circle(cx, cy, config.second_hub_radius, &paints.second_hand);
        layer.draw_circle(cx, cy, config.second_hub_ring_radius, &paints.background);
    }
}

fn add_ticks<S: Surface + ?Sized>(
    surface: &mut S,
    state: &RenderState,
    paints: &Paints,
    config: &FaceConfig,
) {
    let (cx, cy, h) = (state.center_x, state.center_y, state.height as f32);
    let step = tick_step_degrees(config);
    for _ in 0..config.major_ticks {
        surface.draw_line(cx, h - config.major_tick_length, cx, h, &paints.hand);
        surface.rotate(step, cx, cy);
        for _ in 0..config.minor_ticks_per_interval {
            surface.draw_line(cx, h - config.minor_tick_length, cx, h, &paints.minor_tick);
            surface.rotate(step, cx, cy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::scene::{DrawCommand, Scene};

    fn state(width: u32, height: u32, ambient: bool) -> RenderState {
        let mut state = RenderState::new();
        state.apply_surface(width, height, None, &FaceConfig::default());
        state.ambient = ambient;
        state.visible = true;
        state
    }

    fn draw(sample: ClockSample, state: &RenderState, config: &FaceConfig) -> Scene {
        let paints = Paints::new(config, state.ambient);
        let mut scene = Scene::new();
        render_face(&mut scene, &sample, state, &paints, None, config);
        scene
    }

    /// Lines drawn inside the rotated layer with the rotation in effect, mod 360.
    fn rotated_lines(scene: &Scene) -> Vec<(f32, &DrawCommand)> {
        let mut rotation = 0.0;
        let mut lines = Vec::new();
        for command in scene.commands() {
            match command {
                DrawCommand::Save => rotation = 0.0,
                DrawCommand::Rotate { degrees, .. } => rotation += degrees,
                DrawCommand::Line { .. } => lines.push((rotation.rem_euclid(360.0), command)),
                _ => {}
            }
        }
        lines
    }

    fn line_length(command: &DrawCommand) -> f32 {
        match command {
            DrawCommand::Line { x0, y0, x1, y1, .. } => ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt(),
            _ => panic!("not a line"),
        }
    }

    #[test]
    fn quarter_past_three_scenario() {
        let config = FaceConfig::default();
        let scene = draw(ClockSample::new(3, 15, 30, 500), &state(400, 400, false), &config);
        let lines = rotated_lines(&scene);
        assert_eq!(lines.len(), 63);

        let hands = &lines[60..];
        let expected = [(97.5, 100.0), (90.0, 140.0), (183.0, 180.0)];
        for ((rotation, command), (angle, length)) in hands.iter().zip(expected) {
            assert!((rotation - angle).abs() < 1e-3, "{rotation} != {angle}");
            assert!((line_length(command) - length).abs() < 1e-3);
        }
        match hands[2].1 {
            DrawCommand::Line { x0, y0, x1, y1, paint } => {
                assert_eq!((*x0, *y0, *x1), (200.0, 200.0, 200.0));
                assert!((y1 - 20.0).abs() < 1e-3);
                assert_eq!(paint.color, Color::RED);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sixty_ticks_for_any_surface_size() {
        let config = FaceConfig::default();
        for (w, h) in [(0, 0), (1, 1), (240, 240), (454, 400)] {
            let scene = draw(ClockSample::new(10, 8, 0, 0), &state(w, h, true), &config);
            let ticks = rotated_lines(&scene).len() - 2;
            assert_eq!(ticks, 60);
        }
    }

    #[test]
    fn ticks_sweep_one_full_turn() {
        let config = FaceConfig::default();
        let scene = draw(ClockSample::new(0, 0, 0, 0), &state(300, 300, false), &config);
        let lines = rotated_lines(&scene);
        for (i, (rotation, _)) in lines[..60].iter().enumerate() {
            let expected = (i as f32 * 6.0).rem_euclid(360.0);
            assert!((rotation - expected).abs() < 1e-2, "tick {i}");
        }
        let major_count = lines[..60]
            .iter()
            .filter(|(_, c)| line_length(c) == config.major_tick_length)
            .count();
        assert_eq!(major_count, 12);
    }

    #[test]
    fn ambient_drops_the_second_hand_and_anti_aliasing() {
        let config = FaceConfig::builder()
            .boxed_label(crate::config::BoxedLabel::default())
            .build();
        let scene = draw(ClockSample::new(7, 42, 13, 250), &state(320, 320, true), &config);

        let lines = rotated_lines(&scene);
        assert_eq!(lines.len(), 62);
        assert!(scene
            .commands()
            .iter()
            .filter_map(DrawCommand::paint)
            .all(|paint| !paint.anti_alias));
        assert!(!scene.commands().iter().any(|c| c.paint().map(|p| p.color) == Some(Color::RED)));
        let circles = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 2);
    }

    #[test]
    fn interactive_strokes_are_anti_aliased() {
        let config = FaceConfig::default();
        let scene = draw(ClockSample::new(7, 42, 13, 250), &state(320, 320, false), &config);
        assert!(scene
            .commands()
            .iter()
            .filter_map(DrawCommand::paint)
            .all(|paint| paint.anti_alias));
        let radii: Vec<f32> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![13.0, 7.0, 8.0, 4.0]);
    }

    #[test]
    fn drawing_order_and_single_save_restore() {
        let config = FaceConfig::default();
        let scene = draw(ClockSample::new(1, 2, 3, 4), &state(200, 200, false), &config);
        let commands = scene.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        assert!(commands[1..6]
            .iter()
            .all(|c| matches!(c, DrawCommand::Text { .. })));
        assert_eq!(commands[6], DrawCommand::Save);
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));
        let saves = commands.iter().filter(|c| **c == DrawCommand::Save).count();
        let restores = commands.iter().filter(|c| **c == DrawCommand::Restore).count();
        assert_eq!((saves, restores), (1, 1));
    }

    #[test]
    fn background_bitmap_follows_the_fill_at_the_origin() {
        let config = FaceConfig::default();
        let s = state(300, 300, false);
        let paints = Paints::new(&config, false);
        let background = Bitmap::filled(300, 150, Color::new(9, 9, 9));
        let mut scene = Scene::new();
        render_face(
            &mut scene,
            &ClockSample::new(6, 0, 0, 0),
            &s,
            &paints,
            Some(&background),
            &config,
        );

        let commands = scene.commands();
        assert_eq!(commands[0], DrawCommand::Clear(config.background_color));
        assert_eq!(
            commands[1],
            DrawCommand::Bitmap {
                bitmap: background,
                left: 0.0,
                top: 0.0,
                paint: paints.background,
            }
        );
        assert!(commands[2..7]
            .iter()
            .all(|c| matches!(c, DrawCommand::Text { .. })));
        assert_eq!(commands[7], DrawCommand::Save);
    }

    #[test]
    fn legacy_labels_keep_their_original_spots() {
        let config = FaceConfig::default();
        let positions = label_positions(&state(400, 300, false), &config);
        assert_eq!(
            positions,
            [
                ("3", 380.0, 150.0),
                ("6", 200.0, -280.0),
                ("9", -380.0, 150.0),
                ("12", 200.0, 280.0),
                ("12", 200.0, 150.0),
            ]
        );
    }

    #[test]
    fn dial_labels_stay_on_the_surface() {
        let config = FaceConfig::builder()
            .label_placement(LabelPlacement::Dial)
            .build();
        let s = state(400, 300, false);
        for (_, x, y) in label_positions(&s, &config) {
            assert!(x >= 0.0 && x <= 400.0);
            assert!(y >= 0.0 && y <= 300.0);
        }
    }
}
