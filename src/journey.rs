//! Journey animation state machine
//!
//! Drives the launch-to-space animation: idle until launched, then advanced
//! by external clock ticks until complete. Progress is linear in elapsed time
//! and strictly bookkept here; easing is applied only to the camera distance
//! so the reported percentage never jumps around.

use std::time::Duration;

/// Default length of the launch animation
pub const DEFAULT_DURATION: Duration = Duration::from_secs(8);
/// Camera distance at launch
pub const CAMERA_START: f32 = 8.0;
/// Camera distance once fully zoomed out to space
pub const CAMERA_END: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyState {
    Idle,
    Running,
    Complete,
}

/// The journey animation: a clock-driven progression from 0% to 100%
#[derive(Debug, Clone)]
pub struct Journey {
    state: JourneyState,
    elapsed: Duration,
    duration: Duration,
}

impl Journey {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: JourneyState::Idle,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn state(&self) -> JourneyState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == JourneyState::Running
    }

    /// Start (or restart) the animation from the beginning
    pub fn launch(&mut self) {
        self.state = JourneyState::Running;
        self.elapsed = Duration::ZERO;
    }

    /// Return to idle, discarding any progress
    pub fn reset(&mut self) {
        self.state = JourneyState::Idle;
        self.elapsed = Duration::ZERO;
    }

    /// Advance the animation by one clock tick. No-op unless running.
    pub fn tick(&mut self, dt: Duration) {
        if self.state != JourneyState::Running {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = JourneyState::Complete;
        }
    }

    /// Fraction of the animation elapsed, 0.0 to 1.0, linear in time
    pub fn fraction(&self) -> f64 {
        match self.state {
            JourneyState::Idle => 0.0,
            JourneyState::Complete => 1.0,
            JourneyState::Running => {
                if self.duration.is_zero() {
                    1.0
                } else {
                    (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
                }
            }
        }
    }

    /// Animation progress as a percentage, 0 to 100
    pub fn progress_percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Camera distance for the current tick, eased from start to end
    pub fn camera_distance(&self) -> f32 {
        let eased = ease_in_out_cubic(self.fraction()) as f32;
        CAMERA_START + (CAMERA_END - CAMERA_START) * eased
    }
}

impl Default for Journey {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

/// Cubic ease-in-out over [0, 1]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_idle_at_zero() {
        let j = Journey::default();
        assert_eq!(j.state(), JourneyState::Idle);
        assert_eq!(j.progress_percent(), 0.0);
        assert_eq!(j.camera_distance(), CAMERA_START);
    }

    #[test]
    fn runs_then_completes() {
        let mut j = Journey::new(Duration::from_secs(8));
        j.launch();
        assert_eq!(j.state(), JourneyState::Running);

        j.tick(Duration::from_secs(4));
        assert_eq!(j.state(), JourneyState::Running);
        assert!((j.progress_percent() - 50.0).abs() < 1e-9);

        j.tick(Duration::from_secs(4));
        assert_eq!(j.state(), JourneyState::Complete);
        assert_eq!(j.progress_percent(), 100.0);
        assert_eq!(j.camera_distance(), CAMERA_END);
    }

    #[test]
    fn overshoot_clamps_at_complete() {
        let mut j = Journey::new(Duration::from_secs(8));
        j.launch();
        j.tick(Duration::from_secs(60));
        assert_eq!(j.state(), JourneyState::Complete);
        assert_eq!(j.progress_percent(), 100.0);
    }

    #[test]
    fn ticks_are_ignored_unless_running() {
        let mut j = Journey::default();
        j.tick(Duration::from_secs(5));
        assert_eq!(j.state(), JourneyState::Idle);
        assert_eq!(j.progress_percent(), 0.0);

        j.launch();
        j.tick(Duration::from_secs(100));
        j.tick(Duration::from_secs(100));
        assert_eq!(j.state(), JourneyState::Complete);
    }

    #[test]
    fn launch_restarts_from_complete() {
        let mut j = Journey::new(Duration::from_secs(1));
        j.launch();
        j.tick(Duration::from_secs(2));
        assert_eq!(j.state(), JourneyState::Complete);

        j.launch();
        assert_eq!(j.state(), JourneyState::Running);
        assert_eq!(j.progress_percent(), 0.0);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut j = Journey::default();
        j.launch();
        j.tick(Duration::from_secs(3));
        j.reset();
        assert_eq!(j.state(), JourneyState::Idle);
        assert_eq!(j.progress_percent(), 0.0);
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-9);
        assert!((ease_in_out_cubic(1.0) - 1.0).abs() < 1e-9);
        // Slow start: well below linear at t=0.25
        assert!(ease_in_out_cubic(0.25) < 0.25);
    }

    proptest! {
        /// Property: progress never decreases across any sequence of ticks
        #[test]
        fn progress_monotonic_under_ticks(dts in proptest::collection::vec(0u64..500, 1..100)) {
            let mut j = Journey::new(Duration::from_secs(8));
            j.launch();
            let mut last = j.progress_percent();
            for ms in dts {
                j.tick(Duration::from_millis(ms));
                let p = j.progress_percent();
                prop_assert!(p >= last);
                prop_assert!((0.0..=100.0).contains(&p));
                last = p;
            }
        }

        /// Property: camera distance stays within its endpoints
        #[test]
        fn camera_distance_bounded(dts in proptest::collection::vec(0u64..2000, 1..50)) {
            let mut j = Journey::default();
            j.launch();
            for ms in dts {
                j.tick(Duration::from_millis(ms));
                let d = j.camera_distance();
                prop_assert!((CAMERA_START..=CAMERA_END).contains(&d));
            }
        }
    }
}
