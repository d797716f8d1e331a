// Instantaneous frames-per-second from consecutive tick timestamps.
// Timestamps come in as arguments so tests can feed a synthetic clock.

use std::time::Instant;

pub struct FpsMeter {
    prev: Option<Instant>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// FPS for the interval ending at `now`: 1 / Δt against the previous
    /// tick. The first tick has no previous timestamp and reports the 0.0
    /// sentinel rather than dividing by nothing; so does a zero Δt.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let fps = match self.prev {
            Some(prev) => {
                let dt = now.duration_since(prev).as_secs_f32();
                if dt > 0.0 { 1.0 / dt } else { 0.0 }
            }
            None => 0.0,
        };
        self.prev = Some(now);
        fps
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_tick_reports_the_sentinel() {
        let mut meter = FpsMeter::new();
        assert_eq!(meter.tick(Instant::now()), 0.0);
    }

    #[test]
    fn subsequent_ticks_report_one_over_delta() {
        let mut meter = FpsMeter::new();
        let t0 = Instant::now();
        meter.tick(t0);
        let fps = meter.tick(t0 + Duration::from_millis(40));
        assert!((fps - 25.0).abs() < 0.1, "got {fps}");
        let fps = meter.tick(t0 + Duration::from_millis(40) + Duration::from_millis(10));
        assert!((fps - 100.0).abs() < 0.5, "got {fps}");
    }

    #[test]
    fn zero_delta_does_not_divide_by_zero() {
        let mut meter = FpsMeter::new();
        let t0 = Instant::now();
        meter.tick(t0);
        let fps = meter.tick(t0);
        assert_eq!(fps, 0.0);
    }
}
