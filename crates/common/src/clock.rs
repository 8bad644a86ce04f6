//! Clock and timing utilities for capture sessions.
//!
//! Every frame a session samples is stamped relative to a monotonic epoch
//! recorded when the session starts. This module provides:
//! - Capturing the epoch
//! - Elapsed-time queries in the units the pipelines use
//! - A rate controller for fixed-cadence sampling decisions

use std::time::{Duration, Instant};

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment capture started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant capture started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Elapsed time since capture start.
    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Milliseconds elapsed since capture start. Frame timestamps and
    /// still-frame delays are carried in this unit.
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Seconds elapsed since capture start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at capture start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Fixed-rate tick decision helper.
///
/// Used by callers that drive their own loop (the still-frame cadence in the
/// CLI) to decide whether enough time has passed for the next frame. The
/// period is held in nanoseconds; rates that do not divide one second into
/// whole milliseconds, 60 Hz included, keep their exact cadence.
#[derive(Debug)]
pub struct RateController {
    interval: Duration,
    last_tick_ms: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        let hz = u64::from(target_hz.max(1));
        Self {
            interval: Duration::from_nanos((1_000_000_000 / hz).max(1)),
            last_tick_ms: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ms: u64) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            Some(last) if current_ms >= last + self.interval_ms() => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            _ => false,
        }
    }

    /// Exact target interval between ticks. Never zero.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Target interval floored to milliseconds, with a floor of one so
    /// millisecond consumers never receive a zero delay.
    pub fn interval_ms(&self) -> u64 {
        (self.interval.as_millis() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_ms() < 1_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(10);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(50)); // 50ms later, too soon for 10Hz
        assert!(ctrl.should_tick(100)); // 100ms later, should fire
        assert_eq!(ctrl.interval_ms(), 100);
    }

    #[test]
    fn test_rate_controller_never_divides_by_zero() {
        let ctrl = RateController::new(0);
        assert_eq!(ctrl.interval_ms(), 1_000);
    }

    #[test]
    fn test_rate_controller_keeps_sub_millisecond_periods() {
        let ctrl = RateController::new(1_001);
        assert!(ctrl.interval() > Duration::ZERO);
        assert_eq!(ctrl.interval_ms(), 1);
    }

    #[test]
    fn test_rate_controller_holds_sixty_hz_without_drift() {
        let ctrl = RateController::new(60);
        assert_eq!(ctrl.interval(), Duration::from_nanos(16_666_666));
        // 60 ticks land within a rounding error of one second
        assert!(Duration::from_secs(1) - ctrl.interval() * 60 < Duration::from_micros(1));
    }
}
