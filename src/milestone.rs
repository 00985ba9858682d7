//! Space milestones - distance thresholds along the journey to space
//!
//! A milestone track is an ordered ladder of distance thresholds, each with
//! display metadata and an optional 3D reward. Lookups answer three questions
//! for a cumulative distance D: which milestone was last reached, which comes
//! next, and how far along the gap between them the runner is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 3D reward model unlocked by some milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Iss,
    Satellite,
    Moon,
    Mars,
}

/// A named distance threshold with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Cumulative space distance in km needed to reach this milestone
    pub distance_km: f64,
    pub name: String,
    /// Display label for the real altitude, e.g. "408 km"
    pub altitude: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<RewardKind>,
}

#[derive(Error, Debug, PartialEq)]
pub enum MilestoneError {
    #[error("milestone '{0}' has non-finite or negative threshold {1}")]
    InvalidThreshold(String, f64),
    #[error("milestone '{0}' threshold {1} does not exceed the previous threshold {2}")]
    NotStrictlyIncreasing(String, f64, f64),
}

/// Validated, ascending-ordered milestone collection
///
/// Constructed explicitly from config so tests can inject synthetic tracks.
#[derive(Debug, Clone)]
pub struct MilestoneTrack {
    milestones: Vec<Milestone>,
}

impl MilestoneTrack {
    /// Build a track, rejecting thresholds that are not finite, negative,
    /// or not strictly increasing.
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, MilestoneError> {
        let mut prev: Option<f64> = None;
        for m in &milestones {
            if !m.distance_km.is_finite() || m.distance_km < 0.0 {
                return Err(MilestoneError::InvalidThreshold(
                    m.name.clone(),
                    m.distance_km,
                ));
            }
            if let Some(p) = prev {
                if m.distance_km <= p {
                    return Err(MilestoneError::NotStrictlyIncreasing(
                        m.name.clone(),
                        m.distance_km,
                        p,
                    ));
                }
            }
            prev = Some(m.distance_km);
        }
        Ok(Self { milestones })
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Highest-threshold milestone already reached at distance `d`, if any
    pub fn current(&self, d: f64) -> Option<&Milestone> {
        self.milestones
            .iter()
            .rev()
            .find(|m| d >= m.distance_km)
    }

    /// Lowest-threshold milestone still ahead of distance `d`, if any
    pub fn next(&self, d: f64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.distance_km > d)
    }

    /// Progress between the current and next thresholds as a percentage
    ///
    /// Linear interpolation from the current threshold (or 0 before the first
    /// milestone) to the next, clamped to [0, 100]. Past the last threshold
    /// the journey is complete and this returns 100.
    pub fn progress_percent(&self, d: f64) -> f64 {
        let next = match self.next(d) {
            Some(m) => m,
            None => return 100.0,
        };
        let start = self.current(d).map(|m| m.distance_km).unwrap_or(0.0);
        let span = next.distance_km - start;
        let progress = (d - start) / span * 100.0;
        progress.clamp(0.0, 100.0)
    }
}

/// Convert run distance to space distance using the lifetime multiplier ladder
///
/// New runners get a fast start (100x), tapering to 10x as lifetime mileage
/// accumulates.
pub fn space_distance_km(run_km: f64, lifetime_km: f64) -> f64 {
    let multiplier = if lifetime_km < 10.0 {
        100.0
    } else if lifetime_km < 50.0 {
        50.0
    } else if lifetime_km < 100.0 {
        20.0
    } else {
        10.0
    };
    run_km * multiplier
}

/// Flat demo scaling: 1 km run = 100 km space
pub fn space_distance_simple_km(run_km: f64) -> f64 {
    run_km * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn milestone(distance_km: f64, name: &str) -> Milestone {
        Milestone {
            distance_km,
            name: name.to_string(),
            altitude: String::new(),
            icon: String::new(),
            description: None,
            reward: None,
        }
    }

    fn track(thresholds: &[f64]) -> MilestoneTrack {
        let milestones = thresholds
            .iter()
            .enumerate()
            .map(|(i, &d)| milestone(d, &format!("m{i}")))
            .collect();
        MilestoneTrack::new(milestones).unwrap()
    }

    #[test]
    fn mid_gap_lookup() {
        let t = track(&[5.0, 10.0, 100.0]);
        assert_eq!(t.current(7.0).unwrap().distance_km, 5.0);
        assert_eq!(t.next(7.0).unwrap().distance_km, 10.0);
        assert!((t.progress_percent(7.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn below_first_threshold() {
        let t = track(&[5.0, 10.0, 100.0]);
        assert!(t.current(0.0).is_none());
        assert_eq!(t.next(0.0).unwrap().distance_km, 5.0);
        assert_eq!(t.progress_percent(0.0), 0.0);
    }

    #[test]
    fn past_last_threshold() {
        let t = track(&[5.0, 10.0, 100.0]);
        assert_eq!(t.current(1000.0).unwrap().distance_km, 100.0);
        assert!(t.next(1000.0).is_none());
        assert_eq!(t.progress_percent(1000.0), 100.0);
    }

    #[test]
    fn exactly_on_a_threshold() {
        let t = track(&[5.0, 10.0, 100.0]);
        assert_eq!(t.current(10.0).unwrap().distance_km, 10.0);
        assert_eq!(t.next(10.0).unwrap().distance_km, 100.0);
        assert_eq!(t.progress_percent(10.0), 0.0);
    }

    #[test]
    fn empty_track_is_complete() {
        let t = MilestoneTrack::new(vec![]).unwrap();
        assert!(t.current(3.0).is_none());
        assert!(t.next(3.0).is_none());
        assert_eq!(t.progress_percent(3.0), 100.0);
    }

    #[test]
    fn rejects_duplicate_thresholds() {
        let err = MilestoneTrack::new(vec![milestone(5.0, "a"), milestone(5.0, "b")]);
        assert_eq!(
            err.unwrap_err(),
            MilestoneError::NotStrictlyIncreasing("b".to_string(), 5.0, 5.0)
        );
    }

    #[test]
    fn rejects_descending_thresholds() {
        let err = MilestoneTrack::new(vec![milestone(10.0, "a"), milestone(5.0, "b")]);
        assert!(matches!(err, Err(MilestoneError::NotStrictlyIncreasing(..))));
    }

    #[test]
    fn rejects_negative_threshold() {
        let err = MilestoneTrack::new(vec![milestone(-1.0, "a")]);
        assert_eq!(
            err.unwrap_err(),
            MilestoneError::InvalidThreshold("a".to_string(), -1.0)
        );
    }

    #[test]
    fn space_distance_ladder() {
        assert_eq!(space_distance_km(5.0, 0.0), 500.0);
        assert_eq!(space_distance_km(5.0, 25.0), 250.0);
        assert_eq!(space_distance_km(5.0, 75.0), 100.0);
        assert_eq!(space_distance_km(5.0, 500.0), 50.0);
        assert_eq!(space_distance_simple_km(1.5), 150.0);
    }

    proptest! {
        /// Property: current and next are never the same milestone, and at most
        /// one of them is absent
        #[test]
        fn current_next_partition(d in 0.0f64..2000.0) {
            let t = track(&[5.0, 10.0, 100.0]);
            let current = t.current(d).map(|m| m.distance_km);
            let next = t.next(d).map(|m| m.distance_km);
            prop_assert!(current.is_some() || next.is_some());
            if let (Some(c), Some(n)) = (current, next) {
                prop_assert!(c < n);
            }
        }

        /// Property: progress is monotonically non-decreasing in distance
        #[test]
        fn progress_monotonic(d1 in 0.0f64..200.0, d2 in 0.0f64..200.0) {
            let t = track(&[0.05, 0.1, 1.0, 4.0, 10.0, 38.0, 100.0]);
            let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            // Monotone within a gap; resets to 0 when a threshold is crossed,
            // so compare only when both distances share the same next milestone.
            let same_gap = t.next(lo).map(|m| m.distance_km) == t.next(hi).map(|m| m.distance_km);
            if same_gap {
                prop_assert!(t.progress_percent(lo) <= t.progress_percent(hi) + 1e-9);
            }
        }

        /// Property: progress is always within [0, 100]
        #[test]
        fn progress_clamped(d in -10.0f64..2000.0) {
            let t = track(&[5.0, 10.0, 100.0]);
            let p = t.progress_percent(d);
            prop_assert!((0.0..=100.0).contains(&p));
        }
    }
}
