//! Unwrapping of a bounded orientation angle into a continuous rotation signal.
//!
//! The tracking subsystem reports orientation in (-π, π]. Summing normalized
//! differences between consecutive `Normal` samples yields an unbounded angle
//! that keeps growing as the device keeps turning. While tracking is
//! `Limited` the samples are too noisy to integrate, but they still tell us
//! which way the device was turning; they are kept and used to pick the
//! direction of the jump once `Normal` tracking returns.

use std::f64::consts::TAU;

use tracing::debug;

use crate::frame::TrackingQuality;
use crate::geometry::normalize;

/// Converts a bounded angle sequence into a continuous one.
///
/// One tracker per angle axis; state is never shared between instances.
#[derive(Debug, Clone, Default)]
pub struct RotationContinuityTracker {
    continuous_angle: Option<f64>,
    last_normal_angle: Option<f64>,
    pending_limited_angles: Vec<f64>,
}

impl RotationContinuityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbounded angle, `None` until the first `Normal` sample.
    pub fn continuous_angle(&self) -> Option<f64> {
        self.continuous_angle
    }

    pub fn last_normal_angle(&self) -> Option<f64> {
        self.last_normal_angle
    }

    pub fn pending_len(&self) -> usize {
        self.pending_limited_angles.len()
    }

    /// Feed the next sample and return the continuous angle after it.
    pub fn update(&mut self, next_angle: f64, quality: TrackingQuality) -> Option<f64> {
        if !next_angle.is_finite() {
            return self.continuous_angle;
        }

        match quality {
            TrackingQuality::Normal => self.update_normal(next_angle),
            TrackingQuality::Limited(_) => self.pending_limited_angles.push(next_angle),
            TrackingQuality::Unavailable => {}
        }
        self.continuous_angle
    }

    fn update_normal(&mut self, next_angle: f64) {
        let (Some(last), Some(current)) = (self.last_normal_angle, self.continuous_angle) else {
            // Limited samples before the first Normal one carry no usable reference.
            self.pending_limited_angles.clear();
            self.continuous_angle = Some(next_angle);
            self.last_normal_angle = Some(next_angle);
            return;
        };

        let mut diff = normalize(next_angle - last);
        if !self.pending_limited_angles.is_empty() {
            diff = resolve_wraparound(diff, next_angle, &self.pending_limited_angles);
            debug!(
                "[Rotation] resolved gap of {} limited samples to diff {:.3} rad",
                self.pending_limited_angles.len(),
                diff
            );
            self.pending_limited_angles.clear();
        }

        self.continuous_angle = Some(current + diff);
        self.last_normal_angle = Some(next_angle);
    }

    pub fn reset(&mut self) {
        self.continuous_angle = None;
        self.last_normal_angle = None;
        self.pending_limited_angles.clear();
    }
}

/// Choose the direction of `naive_diff` from the limited samples seen in between.
///
/// Each pending sample votes with the sign of `normalize(next - pending)`.
/// With at least half the votes positive the diff is taken in [0, 2π),
/// otherwise in (-2π, 0].
fn resolve_wraparound(naive_diff: f64, next_normal_angle: f64, pending: &[f64]) -> f64 {
    let positive = pending
        .iter()
        .filter(|&&angle| normalize(next_normal_angle - angle) > 0.0)
        .count();

    if positive * 2 >= pending.len() {
        if naive_diff < 0.0 {
            naive_diff + TAU
        } else {
            naive_diff
        }
    } else if naive_diff > 0.0 {
        naive_diff - TAU
    } else {
        naive_diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::LimitedReason;
    use approx::assert_abs_diff_eq;

    const LIMITED: TrackingQuality = TrackingQuality::Limited(LimitedReason::Relocalizing);

    #[test]
    fn test_first_normal_initializes() {
        let mut tracker = RotationContinuityTracker::new();
        assert_eq!(tracker.continuous_angle(), None);
        assert_eq!(tracker.update(0.4, TrackingQuality::Normal), Some(0.4));
    }

    #[test]
    fn test_crossing_pi_boundary_is_monotonic() {
        let mut tracker = RotationContinuityTracker::new();
        let mut previous = f64::NEG_INFINITY;
        for angle in [0.1, 3.1, -3.1, -0.1] {
            let value = tracker.update(angle, TrackingQuality::Normal).unwrap();
            assert!(value > previous, "{} !> {}", value, previous);
            assert!(value - previous.max(0.0) < 3.2);
            previous = value;
        }
        assert_abs_diff_eq!(previous, TAU - 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_limited_gap_resolved_by_majority() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(0.0, TrackingQuality::Normal);
        assert_eq!(tracker.update(1.5, LIMITED), Some(0.0));
        assert_eq!(tracker.update(2.0, LIMITED), Some(0.0));
        assert_eq!(tracker.pending_len(), 2);

        let value = tracker.update(-3.0, TrackingQuality::Normal).unwrap();
        // Shortest path would be -3.0; the limited samples say we kept turning forward.
        assert_abs_diff_eq!(value, TAU - 3.0, epsilon = 1e-9);
        assert_eq!(tracker.pending_len(), 0);
    }

    #[test]
    fn test_limited_gap_negative_majority() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(0.0, TrackingQuality::Normal);
        tracker.update(-1.5, LIMITED);
        tracker.update(-2.0, LIMITED);
        tracker.update(-2.5, LIMITED);

        // Naive diff is +3.0, but the device was turning backwards.
        let value = tracker.update(3.0, TrackingQuality::Normal).unwrap();
        assert_abs_diff_eq!(value, 3.0 - TAU, epsilon = 1e-9);
    }

    #[test]
    fn test_limited_gap_consistent_with_naive_diff() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(0.0, TrackingQuality::Normal);
        tracker.update(0.3, LIMITED);
        let value = tracker.update(0.5, TrackingQuality::Normal).unwrap();
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unavailable_is_noop() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(1.0, TrackingQuality::Normal);
        tracker.update(-2.0, TrackingQuality::Unavailable);
        assert_eq!(tracker.pending_len(), 0);
        assert_eq!(tracker.last_normal_angle(), Some(1.0));
        assert_eq!(tracker.continuous_angle(), Some(1.0));
    }

    #[test]
    fn test_limited_before_first_normal_discarded() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(2.0, LIMITED);
        assert_eq!(tracker.continuous_angle(), None);
        assert_eq!(tracker.update(-1.0, TrackingQuality::Normal), Some(-1.0));
        assert_eq!(tracker.pending_len(), 0);
    }

    #[test]
    fn test_multiple_turns_accumulate() {
        let mut tracker = RotationContinuityTracker::new();
        let step = 0.5;
        let mut raw = 0.0;
        for _ in 0..40 {
            tracker.update(normalize(raw), TrackingQuality::Normal);
            raw += step;
        }
        assert_abs_diff_eq!(tracker.continuous_angle().unwrap(), 39.0 * step, epsilon = 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut tracker = RotationContinuityTracker::new();
        tracker.update(1.0, TrackingQuality::Normal);
        tracker.update(1.2, LIMITED);
        tracker.reset();
        assert_eq!(tracker.continuous_angle(), None);
        assert_eq!(tracker.pending_len(), 0);
    }
}
