// ============================================================================
// CLOCK
// ============================================================================

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Timelike, Utc};

/// Degrees swept per second/minute tick (360 / 60).
pub const DEGREES_PER_TICK: f32 = 6.0;
/// Degrees swept per hour by the hour hand (360 / 12).
pub const DEGREES_PER_HOUR: f32 = 30.0;
/// Extra hour-hand travel per elapsed minute (30 / 60).
pub const HOUR_HAND_DEGREES_PER_MINUTE: f32 = 0.5;

/// Source of wall-clock time and of the system's current time zone.
///
/// The engine never reads the clock directly so that hosts (and tests) can
/// drive it with whatever time base they have.
pub trait TimeSource {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The system's default UTC offset right now.
    fn system_offset(&self) -> FixedOffset;

    /// The system zone's UTC offset in effect at `instant`.
    ///
    /// Differs from [`system_offset`](Self::system_offset) across daylight
    /// saving transitions. Sources without zone rules report the current offset.
    fn offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        self.system_offset()
    }

    /// Milliseconds since the Unix epoch, used for second-boundary alignment.
    fn now_millis(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn system_offset(&self) -> FixedOffset {
        (**self).system_offset()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        (**self).offset_at(instant)
    }
}

/// Time source backed by the operating system clock and time zone database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn system_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc())
    }
}

/// Which zone a [`Calendar`] reads local time in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The system zone, rules included, as reported by the [`TimeSource`].
    #[default]
    System,
    /// A fixed offset that never observes daylight saving.
    Fixed(FixedOffset),
}

/// Converts instants to local clock readings.
///
/// The offset is resolved for every instant, so a daylight-saving transition
/// moves the hands without any time-zone notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calendar {
    zone: Zone,
}

impl Calendar {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn system() -> Self {
        Self::new(Zone::System)
    }

    pub fn utc() -> Self {
        Self::new(Zone::Fixed(Utc.fix()))
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Switch zones. Returns whether the zone actually changed.
    pub fn set_zone(&mut self, zone: Zone) -> bool {
        let changed = self.zone != zone;
        self.zone = zone;
        changed
    }

    /// UTC offset this calendar applies at `instant`.
    pub fn offset_at<T: TimeSource + ?Sized>(
        &self,
        time: &T,
        instant: DateTime<Utc>,
    ) -> FixedOffset {
        match self.zone {
            Zone::System => time.offset_at(instant),
            Zone::Fixed(offset) => offset,
        }
    }

    pub fn sample<T: TimeSource + ?Sized>(
        &self,
        time: &T,
        instant: DateTime<Utc>,
    ) -> ClockSample {
        let local = instant.with_timezone(&self.offset_at(time, instant));
        ClockSample::new(
            local.hour(),
            local.minute(),
            local.second(),
            // leap seconds report >= 1000
            local.timestamp_subsec_millis().min(999),
        )
    }
}

/// Local time of day as the face needs it: 12-hour hour plus sub-second part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl ClockSample {
    /// `hour` may be given on a 24-hour clock; it is folded to 0..=11.
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self {
            hour: hour % 12,
            minute,
            second,
            millisecond,
        }
    }

    pub fn fractional_second(&self) -> f32 {
        self.millisecond as f32 / 1000.0
    }

    pub fn hand_angles(&self) -> HandAngles {
        HandAngles {
            hours: self.hour as f32 * DEGREES_PER_HOUR
                + self.minute as f32 * HOUR_HAND_DEGREES_PER_MINUTE,
            minutes: self.minute as f32 * DEGREES_PER_TICK,
            seconds: (self.second as f32 + self.fractional_second()) * DEGREES_PER_TICK,
        }
    }
}

/// Clockwise rotation of each hand from 12 o'clock, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hours: f32,
    pub minutes: f32,
    pub seconds: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn quarter_past_three_and_a_half_seconds() {
        let angles = ClockSample::new(3, 15, 30, 500).hand_angles();
        assert!(approx(angles.hours, 97.5));
        assert!(approx(angles.minutes, 90.0));
        assert!(approx(angles.seconds, 183.0));
    }

    #[test]
    fn afternoon_hours_fold_onto_the_dial() {
        assert_eq!(ClockSample::new(15, 0, 0, 0), ClockSample::new(3, 0, 0, 0));
        assert_eq!(ClockSample::new(12, 0, 0, 0).hour, 0);
    }

    #[test]
    fn hour_hand_moves_half_a_degree_per_minute() {
        for hour in 0..12 {
            for minute in 0..59 {
                let a = ClockSample::new(hour, minute, 0, 0).hand_angles().hours;
                let b = ClockSample::new(hour, minute + 1, 0, 0).hand_angles().hours;
                assert!(approx(b - a, 0.5), "{hour}:{minute}");
            }
        }
    }

    #[test]
    fn second_hand_is_monotonic_within_a_minute() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let (s0, ms0) = (rng.random_range(0..60u32), rng.random_range(0..1000u32));
            let (s1, ms1) = (rng.random_range(0..60u32), rng.random_range(0..1000u32));
            let a = ClockSample::new(0, 0, s0, ms0).hand_angles().seconds;
            let b = ClockSample::new(0, 0, s1, ms1).hand_angles().seconds;
            assert_eq!((s0, ms0) < (s1, ms1), a < b);
            assert!(approx(a, (s0 as f32 + ms0 as f32 / 1000.0) * 6.0));
        }
    }

    /// Zone with daylight saving from 01:00 UTC on 2024-03-31: +01:00 before, +02:00 after.
    struct SpringForward;

    impl TimeSource for SpringForward {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()
        }

        fn system_offset(&self) -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
            let switch = Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap();
            let hours = if instant < switch { 1 } else { 2 };
            FixedOffset::east_opt(hours * 3600).unwrap()
        }
    }

    #[test]
    fn fixed_zone_applies_its_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 1, 15, 30).unwrap()
            + chrono::Duration::milliseconds(500);
        let mut calendar = Calendar::utc();
        assert_eq!(calendar.sample(&SystemClock, instant), ClockSample::new(1, 15, 30, 500));

        let plus_two = Zone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap());
        assert!(calendar.set_zone(plus_two));
        assert!(!calendar.set_zone(plus_two));
        assert_eq!(calendar.sample(&SystemClock, instant), ClockSample::new(3, 15, 30, 500));
    }

    #[test]
    fn system_zone_follows_daylight_saving() {
        let calendar = Calendar::system();
        let before = Utc.with_ymd_and_hms(2024, 3, 31, 0, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap();
        assert_eq!(calendar.sample(&SpringForward, before).hour, 1);
        assert_eq!(calendar.sample(&SpringForward, after).hour, 3);
        assert_eq!(
            calendar.sample(&SpringForward, after).hand_angles().hours,
            105.0
        );
    }

    #[test]
    fn offset_defaults_to_the_current_system_offset() {
        struct Flat;
        impl TimeSource for Flat {
            fn now(&self) -> DateTime<Utc> {
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            }
            fn system_offset(&self) -> FixedOffset {
                FixedOffset::west_opt(5 * 3600).unwrap()
            }
        }
        let instant = Flat.now();
        assert_eq!(Flat.offset_at(instant).local_minus_utc(), -5 * 3600);
        assert_eq!(Calendar::system().sample(&Flat, instant).hour, 7);
    }
}
