// ============================================================================
// WATCH FACE ENGINE
// ============================================================================

use chrono::FixedOffset;
use log::{debug, info, trace};

use crate::bitmap::Bitmap;
use crate::clock::{Calendar, TimeSource};
use crate::config::FaceConfig;
use crate::renderer::{render_face, Paints};
use crate::scheduler::{FireOutcome, RedrawScheduler, TimerToken};
use crate::state::RenderState;
use crate::surface::{Rect, Surface};
use crate::timezone::TimeZoneReceiver;

/// Analog watch face driven entirely by host callbacks.
///
/// All callbacks are expected on one thread, one at a time. The engine never
/// draws on its own: it calls [`invalidate`](Self::invalidate) and the host
/// picks the request up with [`take_redraw_request`](Self::take_redraw_request)
/// and eventually calls [`on_draw`](Self::on_draw).
pub struct WatchFaceEngine<T: TimeSource> {
    config: FaceConfig,
    time: T,
    state: RenderState,
    calendar: Calendar,
    last_offset: FixedOffset,
    scheduler: RedrawScheduler,
    time_zone_receiver: TimeZoneReceiver,
    paints: Paints,
    background: Option<Bitmap>,
    scaled_background: Option<Bitmap>,
    redraw_requested: bool,
}

impl<T: TimeSource> WatchFaceEngine<T> {
    pub fn new(config: FaceConfig, time: T) -> Self {
        let calendar = Calendar::new(config.zone);
        let last_offset = calendar.offset_at(&time, time.now());
        let scheduler = RedrawScheduler::new(config.interactive_update_rate_ms);
        let paints = Paints::new(&config, false);
        let background = config.background.clone();
        Self {
            config,
            time,
            state: RenderState::new(),
            calendar,
            last_offset,
            scheduler,
            time_zone_receiver: TimeZoneReceiver::default(),
            paints,
            scaled_background: background.clone(),
            background,
            redraw_requested: false,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn on_create(&mut self) {
        self.paints = Paints::new(&self.config, self.state.ambient);
        self.background = self.config.background.clone();
        self.scaled_background = self.background.clone();
        self.refresh_time_zone();
        info!(
            "watch face created (update every {} ms, background {})",
            self.scheduler.interval_ms(),
            match &self.background {
                Some(bitmap) => format!("{}x{}", bitmap.width(), bitmap.height()),
                None => "none".to_string(),
            }
        );
    }

    pub fn on_destroy(&mut self) {
        self.scheduler.cancel();
        self.time_zone_receiver.unregister();
        info!("watch face destroyed");
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        let background_width = self.background.as_ref().map(Bitmap::width);
        self.state
            .apply_surface(width, height, background_width, &self.config);
        self.scaled_background = self.background.as_ref().map(|original| {
            let (w, h) = self
                .state
                .scaled_background_size(original.width(), original.height());
            original.scaled(w, h)
        });
        debug!(
            "surface {}x{}: center ({}, {}), scale {}",
            width, height, self.state.center_x, self.state.center_y, self.state.scale
        );
        self.update_timer();
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        self.state.visible = visible;
        if visible {
            self.time_zone_receiver.register();
            // the zone may have changed while we were hidden
            if self.refresh_time_zone() {
                info!("time zone is now UTC{}", self.last_offset);
            }
            self.invalidate();
        } else {
            self.time_zone_receiver.unregister();
        }
        debug!("visibility changed: {}", visible);
        self.update_timer();
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        if self.state.ambient != ambient {
            self.state.ambient = ambient;
            debug!("ambient mode: {}", ambient);
        }
        self.paints.set_ambient(ambient);
        self.invalidate();
        self.update_timer();
    }

    /// Once-a-minute tick from the host, the only redraw source in ambient mode.
    pub fn on_time_tick(&mut self) {
        self.invalidate();
    }

    /// The system time zone changed. Ignored while not observing.
    pub fn on_time_zone_changed(&mut self) {
        if !self.time_zone_receiver.is_registered() {
            trace!("time zone change while not observing");
            return;
        }
        if self.refresh_time_zone() {
            info!("time zone changed to UTC{}", self.last_offset);
        }
        self.invalidate();
    }

    /// Deliver a redraw-timer wake-up. Returns whether it was current.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> bool {
        let now_ms = self.time.now_millis();
        match self
            .scheduler
            .fire(token, now_ms, self.state.timer_eligible())
        {
            FireOutcome::Stale => false,
            FireOutcome::Redraw { .. } => {
                self.invalidate();
                true
            }
        }
    }

    /// Fire the redraw timer if it is due now. Returns whether it fired.
    pub fn poll_timer(&mut self) -> bool {
        match self.scheduler.due(self.time.now_millis()) {
            Some(token) => self.on_timer_fired(token),
            None => false,
        }
    }

    pub fn on_draw<S: Surface + ?Sized>(&mut self, surface: &mut S, bounds: Rect) {
        let sample = self.calendar.sample(&self.time, self.time.now());
        trace!(
            "drawing {:?} into {}x{}",
            sample,
            bounds.width(),
            bounds.height()
        );
        render_face(
            surface,
            &sample,
            &self.state,
            &self.paints,
            self.scaled_background.as_ref(),
            &self.config,
        );
    }

    // ------------------------------------------------------------------------
    // Redraw requests
    // ------------------------------------------------------------------------

    pub fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    pub fn is_redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Consume the pending redraw request, if any.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Token and wall-clock due time (ms since epoch) of the armed timer.
    pub fn next_timer_deadline(&self) -> Option<(TimerToken, u64)> {
        self.scheduler.deadline()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn paints(&self) -> &Paints {
        &self.paints
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn scaled_background(&self) -> Option<&Bitmap> {
        self.scaled_background.as_ref()
    }

    /// UTC offset the face reads local time in right now.
    pub fn current_offset(&self) -> FixedOffset {
        self.calendar.offset_at(&self.time, self.time.now())
    }

    pub fn is_observing_time_zone(&self) -> bool {
        self.time_zone_receiver.is_registered()
    }

    pub fn time_source(&self) -> &T {
        &self.time
    }

    /// Reload the configured zone. Returns whether the offset in effect moved.
    fn refresh_time_zone(&mut self) -> bool {
        self.calendar.set_zone(self.config.zone);
        let offset = self.current_offset();
        let changed = offset != self.last_offset;
        self.last_offset = offset;
        changed
    }

    /// Cancel-then-maybe-arm; the only place the timer is (re)armed from
    /// outside a fire.
    fn update_timer(&mut self) {
        self.scheduler
            .reconcile(self.state.timer_eligible(), self.time.now_millis());
    }
}
