use std::time::{Duration, Instant};

/// A single frame's timing sample.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created.
    ///
    /// Unclamped; intended for driving animation (palette cycling, zoom easing).
    pub elapsed: f32,

    /// Instant the tick was taken.
    pub now: Instant,

    /// Frames ticked before this one, starting at 0.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per display; `Display::update` ticks it once per loop iteration.
///
/// Delta time is clamped so that debugger pauses, window drags and minimized
/// stretches do not feed pathological values into animation code.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with the default clamps.
    ///
    /// The minimum guards against zero-dt from tight loops; the maximum keeps
    /// a long stall from producing a giant animation step.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with explicit delta clamps.
    ///
    /// The clamps may be given in either order; they are normalized here so
    /// `tick` never sees an inverted range.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        let (dt_min, dt_max) = if dt_min <= dt_max {
            (dt_min, dt_max)
        } else {
            (dt_max, dt_min)
        };
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta-time baseline without touching `elapsed` or the frame
    /// counter.
    ///
    /// Useful after surface reconfiguration, where the gap is not animation time.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock, producing the next `FrameTime`.
    ///
    /// The first tick reports the minimum clamp as its delta.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn first_tick_reports_minimum_dt() {
        // A wide minimum makes the clamp observable regardless of scheduling.
        let min = Duration::from_millis(50);
        let mut clock = FrameClock::with_clamps(min, Duration::from_secs(1));
        let ft = clock.tick();
        assert_eq!(ft.dt, min.as_secs_f32());
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_never_exceeds_max_clamp() {
        let max = Duration::from_millis(5);
        let mut clock = FrameClock::with_clamps(Duration::from_micros(1), max);
        std::thread::sleep(Duration::from_millis(20));
        let ft = clock.tick();
        assert!(ft.dt <= max.as_secs_f32() + f32::EPSILON);
    }

    #[test]
    fn dt_never_below_min_clamp() {
        let min = Duration::from_millis(2);
        let mut clock = FrameClock::with_clamps(min, Duration::from_secs(1));
        let ft = clock.tick();
        assert!(ft.dt >= min.as_secs_f32());
    }

    #[test]
    fn clamps_given_in_either_order_are_normalized() {
        let mut clock = FrameClock::with_clamps(Duration::from_secs(1), Duration::from_millis(2));
        let ft = clock.tick();
        assert!(ft.dt >= Duration::from_millis(2).as_secs_f32());
        assert!(ft.dt <= 1.0);
    }

    // ── elapsed ───────────────────────────────────────────────────────────

    #[test]
    fn elapsed_is_monotonic_across_ticks() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed;
        std::thread::sleep(Duration::from_millis(2));
        let b = clock.tick().elapsed;
        assert!(b >= a);
    }

    #[test]
    fn reset_does_not_rewind_elapsed() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(2));
        let before = clock.tick().elapsed;
        clock.reset();
        let after = clock.tick().elapsed;
        assert!(after >= before);
    }
}
