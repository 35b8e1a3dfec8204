//! Movement filter: only admit frames taken from a noticeably different pose.

use serde::{Deserialize, Serialize};

use crate::filters::{FilterCost, FilterOutcome, PrimeFilter, RejectionReason};
use crate::frame::Frame;
use crate::geometry::SE3;

/// Parameters for the combined translation/rotation movement metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementFilterConfig {
    /// Frames whose movement metric is at or below this value are rejected.
    pub threshold: f64,
    /// Metres of translation one radian of rotation counts as.
    pub rotation_weight: f64,
}

impl Default for MovementFilterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            rotation_weight: 0.5,
        }
    }
}

/// Stateful filter holding the pose of the last frame it accepted.
///
/// The metric is `|Δt| + rotation_weight * angle(ΔR)`, computed on the
/// relative transform so that rotations compose properly.
pub struct MovementFilter {
    config: MovementFilterConfig,
    last_accepted_pose: Option<SE3>,
}

impl MovementFilter {
    pub fn new(config: MovementFilterConfig) -> Self {
        Self {
            config,
            last_accepted_pose: None,
        }
    }

    /// Movement of `pose` relative to `reference`.
    pub fn movement(&self, reference: &SE3, pose: &SE3) -> f64 {
        let delta = pose.relative_to(reference);
        delta.translation.norm() + self.config.rotation_weight * delta.rotation.angle()
    }

    pub fn last_accepted_pose(&self) -> Option<&SE3> {
        self.last_accepted_pose.as_ref()
    }

    pub fn check(&mut self, pose: &SE3) -> FilterOutcome {
        if let Some(ref reference) = self.last_accepted_pose {
            if !(self.movement(reference, pose) > self.config.threshold) {
                return FilterOutcome::Rejected(RejectionReason::MovingTooLittle);
            }
        }
        self.last_accepted_pose = Some(pose.clone());
        FilterOutcome::Accepted
    }
}

impl Default for MovementFilter {
    fn default() -> Self {
        Self::new(MovementFilterConfig::default())
    }
}

impl PrimeFilter for MovementFilter {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn cost(&self) -> FilterCost {
        FilterCost::Moderate
    }

    fn evaluate(&mut self, frame: &Frame) -> FilterOutcome {
        self.check(&frame.pose)
    }

    fn reset(&mut self) {
        self.last_accepted_pose = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn at(x: f64, yaw: f64) -> SE3 {
        SE3::new(
            UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
            Vector3::new(x, 0.0, 0.0),
        )
    }

    fn filter(threshold: f64) -> MovementFilter {
        MovementFilter::new(MovementFilterConfig {
            threshold,
            rotation_weight: 1.0,
        })
    }

    #[test]
    fn test_first_pose_is_accepted() {
        let mut f = filter(0.1);
        assert!(f.check(&at(0.0, 0.0)).is_accepted());
        assert!(f.last_accepted_pose().is_some());
    }

    #[test]
    fn test_within_threshold_rejected() {
        let mut f = filter(0.1);
        f.check(&at(0.0, 0.0));

        for pose in [at(0.05, 0.0), at(0.0, 0.05), at(0.04, 0.04), at(0.0, 0.0)] {
            assert_eq!(
                f.check(&pose),
                FilterOutcome::Rejected(RejectionReason::MovingTooLittle)
            );
        }
        // Reference is unchanged by rejections.
        assert_eq!(f.last_accepted_pose(), Some(&at(0.0, 0.0)));
    }

    #[test]
    fn test_beyond_threshold_becomes_reference() {
        let mut f = filter(0.1);
        f.check(&at(0.0, 0.0));

        assert!(f.check(&at(0.2, 0.0)).is_accepted());
        assert_eq!(f.last_accepted_pose(), Some(&at(0.2, 0.0)));

        // Measured against the new reference now.
        assert!(!f.check(&at(0.25, 0.0)).is_accepted());
        assert!(f.check(&at(0.2, 0.15)).is_accepted());
    }

    #[test]
    fn test_rotation_contributes_through_weight() {
        let mut f = MovementFilter::new(MovementFilterConfig {
            threshold: 0.1,
            rotation_weight: 0.5,
        });
        f.check(&at(0.0, 0.0));
        // 0.15 rad * 0.5 = 0.075 <= 0.1
        assert!(!f.check(&at(0.0, 0.15)).is_accepted());
        // 0.3 rad * 0.5 = 0.15 > 0.1
        assert!(f.check(&at(0.0, 0.3)).is_accepted());
    }

    #[test]
    fn test_reset_forgets_reference() {
        let mut f = filter(0.1);
        f.check(&at(0.0, 0.0));
        f.reset();
        assert!(f.check(&at(0.0, 0.0)).is_accepted());
    }
}
