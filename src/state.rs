// ============================================================================
// RENDER STATE
// ============================================================================

use crate::config::FaceConfig;

/// Geometry and display mode the face is currently drawn with.
///
/// Geometry is always derived from the latest surface size alone, never
/// adjusted incrementally, so repeated or out-of-order size changes cannot
/// leave stale values behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub width: u32,
    pub height: u32,
    pub center_x: f32,
    pub center_y: f32,
    /// Surface width over the original background width.
    pub scale: f32,
    pub hour_hand_length: f32,
    pub minute_hand_length: f32,
    pub second_hand_length: f32,
    pub ambient: bool,
    pub visible: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            center_x: 0.0,
            center_y: 0.0,
            scale: 1.0,
            hour_hand_length: 0.0,
            minute_hand_length: 0.0,
            second_hand_length: 0.0,
            ambient: false,
            visible: false,
        }
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive every size-dependent field for a `width` x `height` surface.
    ///
    /// `background_width` is the width of the unscaled background image.
    pub fn apply_surface(
        &mut self,
        width: u32,
        height: u32,
        background_width: Option<u32>,
        config: &FaceConfig,
    ) {
        let half_width = width as f32 / 2.0;
        self.width = width;
        self.height = height;
        self.center_x = half_width;
        self.center_y = height as f32 / 2.0;
        self.scale = match background_width {
            Some(bg) if bg > 0 => width as f32 / bg as f32,
            _ => 1.0,
        };
        self.hour_hand_length = config.hour_hand_fraction * half_width;
        self.minute_hand_length = config.minute_hand_fraction * half_width;
        self.second_hand_length = config.second_hand_fraction * half_width;
    }

    /// The redraw timer only runs while the face is on screen and interactive.
    pub fn timer_eligible(&self) -> bool {
        self.visible && !self.ambient
    }

    /// Size of a `bg_width` x `bg_height` background scaled to this surface's
    /// width, aspect ratio kept and fractional pixels truncated.
    pub fn scaled_background_size(&self, bg_width: u32, bg_height: u32) -> (u32, u32) {
        if bg_width == 0 {
            return (0, 0);
        }
        let height = bg_height as u64 * self.width as u64 / bg_width as u64;
        (self.width, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_are_fractions_of_half_the_width() {
        let mut state = RenderState::new();
        state.apply_surface(400, 300, None, &FaceConfig::default());
        assert_eq!((state.center_x, state.center_y), (200.0, 150.0));
        assert!((state.hour_hand_length - 100.0).abs() < 1e-4);
        assert!((state.minute_hand_length - 140.0).abs() < 1e-4);
        assert!((state.second_hand_length - 180.0).abs() < 1e-4);
        assert!(state.hour_hand_length < state.minute_hand_length);
        assert!(state.minute_hand_length < state.second_hand_length);
        assert_eq!(state.scale, 1.0);
    }

    #[test]
    fn last_size_wins() {
        let config = FaceConfig::default();
        let mut resized = RenderState::new();
        for (w, h) in [(10, 10), (999, 20), (0, 0), (320, 320)] {
            resized.apply_surface(w, h, Some(640), &config);
        }
        let mut direct = RenderState::new();
        direct.apply_surface(320, 320, Some(640), &config);
        assert_eq!(resized, direct);
        assert_eq!(direct.scale, 0.5);

        let mut twice = direct;
        twice.apply_surface(320, 320, Some(640), &config);
        assert_eq!(twice, direct);
    }

    #[test]
    fn zero_surface_gives_degenerate_geometry() {
        let mut state = RenderState::new();
        state.apply_surface(0, 0, Some(100), &FaceConfig::default());
        assert_eq!(state.second_hand_length, 0.0);
        assert_eq!(state.scale, 0.0);
        assert_eq!(state.scaled_background_size(100, 50), (0, 0));
    }

    #[test]
    fn background_keeps_its_aspect_ratio() {
        let mut state = RenderState::new();
        state.apply_surface(390, 390, Some(512), &FaceConfig::default());
        assert_eq!(state.scaled_background_size(512, 256), (390, 195));
    }

    #[test]
    fn eligibility_needs_visible_and_interactive() {
        let mut state = RenderState::new();
        for (visible, ambient, eligible) in [
            (false, false, false),
            (false, true, false),
            (true, true, false),
            (true, false, true),
        ] {
            state.visible = visible;
            state.ambient = ambient;
            assert_eq!(state.timer_eligible(), eligible);
        }
    }
}
