/// Weight of the newest interval in the frame-rate moving average.
const FPS_SMOOTHING: f64 = 0.1;

/// Shared tick counter driving every layer.
///
/// Timestamps come from the scheduler (milliseconds, monotonic in practice).
/// A timestamp that is not finite or goes backwards still counts as a tick
/// but does not move time.
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    tick: u64,
    start_ms: Option<f64>,
    last_ms: Option<f64>,
    fps: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a tick at `time_ms`; returns the new tick number.
    pub fn advance(&mut self, time_ms: f64) -> u64 {
        self.tick += 1;
        if !time_ms.is_finite() {
            return self.tick;
        }

        match self.last_ms {
            None => self.start_ms = Some(time_ms),
            Some(last) if time_ms > last => {
                let instant_fps = 1000.0 / (time_ms - last);
                self.fps = if self.fps == 0.0 {
                    instant_fps
                } else {
                    self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
                };
            }
            Some(_) => return self.tick,
        }
        self.last_ms = Some(time_ms);
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Smoothed frames per second; 0 until two ticks have been seen.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn last_time_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Seconds between the first and latest tick.
    pub fn seconds(&self) -> f64 {
        match (self.start_ms, self.last_ms) {
            (Some(start), Some(last)) => (last - start) / 1000.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ticks() {
        let mut clock = AnimationClock::new();
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(16.0), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn steady_cadence_converges_to_frame_rate() {
        let mut clock = AnimationClock::new();
        for i in 0..200 {
            clock.advance(i as f64 * 1000.0 / 60.0);
        }
        assert!((clock.fps() - 60.0).abs() < 0.01, "fps = {}", clock.fps());
        assert!((clock.seconds() - 199.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn fps_is_zero_before_second_tick() {
        let mut clock = AnimationClock::new();
        clock.advance(500.0);
        assert_eq!(clock.fps(), 0.0);
        assert_eq!(clock.seconds(), 0.0);
    }

    #[test]
    fn backwards_or_nan_time_does_not_move_clock() {
        let mut clock = AnimationClock::new();
        clock.advance(100.0);
        clock.advance(116.0);
        let fps = clock.fps();

        clock.advance(50.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.tick(), 4);
        assert_eq!(clock.fps(), fps);
        assert_eq!(clock.last_time_ms(), Some(116.0));
    }
}
