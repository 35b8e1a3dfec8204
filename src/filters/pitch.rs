//! Pitch bounds filter.

use serde::{Deserialize, Serialize};

use crate::filters::{FilterCost, FilterOutcome, PrimeFilter, RejectionReason};
use crate::frame::Frame;
use crate::geometry::deg_to_rad;

/// Allowed camera tilt, in degrees. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchFilterConfig {
    /// How far the camera may point below the horizon.
    pub max_downward_tilt_deg: f64,
    /// How far the camera may point above the horizon.
    pub max_upward_tilt_deg: f64,
}

impl Default for PitchFilterConfig {
    fn default() -> Self {
        Self {
            max_downward_tilt_deg: 65.0,
            max_upward_tilt_deg: 30.0,
        }
    }
}

/// Accepts frames whose pitch lies in `[-max_downward, +max_upward]`.
pub struct PitchFilter {
    max_downward_rad: f64,
    max_upward_rad: f64,
}

impl PitchFilter {
    pub fn new(config: &PitchFilterConfig) -> Self {
        Self::from_radians(
            deg_to_rad(config.max_downward_tilt_deg),
            deg_to_rad(config.max_upward_tilt_deg),
        )
    }

    pub fn from_radians(max_downward_rad: f64, max_upward_rad: f64) -> Self {
        Self {
            max_downward_rad,
            max_upward_rad,
        }
    }

    pub fn check(&self, pitch: f64) -> FilterOutcome {
        if pitch.is_nan() {
            FilterOutcome::Rejected(RejectionReason::Unknown)
        } else if pitch > self.max_upward_rad {
            FilterOutcome::Rejected(RejectionReason::PitchTooHigh)
        } else if pitch < -self.max_downward_rad {
            FilterOutcome::Rejected(RejectionReason::PitchTooLow)
        } else {
            FilterOutcome::Accepted
        }
    }
}

impl Default for PitchFilter {
    fn default() -> Self {
        Self::new(&PitchFilterConfig::default())
    }
}

impl PrimeFilter for PitchFilter {
    fn name(&self) -> &'static str {
        "pitch"
    }

    fn cost(&self) -> FilterCost {
        FilterCost::Trivial
    }

    fn evaluate(&mut self, frame: &Frame) -> FilterOutcome {
        self.check(frame.euler.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuilder;

    #[test]
    fn test_default_bounds_inclusive() {
        let filter = PitchFilter::from_radians(1.0, 0.5);
        assert_eq!(filter.check(0.5), FilterOutcome::Accepted);
        assert_eq!(filter.check(-1.0), FilterOutcome::Accepted);
        assert_eq!(filter.check(0.0), FilterOutcome::Accepted);
    }

    #[test]
    fn test_outside_bounds() {
        let filter = PitchFilter::from_radians(1.0, 0.5);
        assert_eq!(
            filter.check(0.5 + 1e-9),
            FilterOutcome::Rejected(RejectionReason::PitchTooHigh)
        );
        assert_eq!(
            filter.check(-1.0 - 1e-9),
            FilterOutcome::Rejected(RejectionReason::PitchTooLow)
        );
        assert_eq!(
            filter.check(f64::NAN),
            FilterOutcome::Rejected(RejectionReason::Unknown)
        );
    }

    #[test]
    fn test_nan_rejected_even_with_open_bounds() {
        let filter = PitchFilter::from_radians(f64::INFINITY, f64::INFINITY);
        assert_eq!(
            filter.check(f64::NAN),
            FilterOutcome::Rejected(RejectionReason::Unknown)
        );
        assert!(filter.check(1e6).is_accepted());
    }

    #[test]
    fn test_accepts_iff_within_bounds() {
        let mut filter = PitchFilter::default();
        let down = 65f64.to_radians();
        let up = 30f64.to_radians();

        let mut pitch = -1.6;
        while pitch <= 1.6 {
            let frame = FrameBuilder::new(1, 0.0).pitch(pitch).build();
            let accepted = filter.evaluate(&frame).is_accepted();
            assert_eq!(accepted, -down <= pitch && pitch <= up, "pitch {}", pitch);
            pitch += 0.013;
        }
    }

    #[test]
    fn test_config_in_degrees() {
        let filter = PitchFilter::new(&PitchFilterConfig {
            max_downward_tilt_deg: 10.0,
            max_upward_tilt_deg: 10.0,
        });
        assert!(filter.check(9f64.to_radians()).is_accepted());
        assert!(!filter.check(11f64.to_radians()).is_accepted());
        assert!(!filter.check(-11f64.to_radians()).is_accepted());
    }
}
