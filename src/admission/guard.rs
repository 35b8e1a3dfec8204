//! Frame admission guard: cheap pass/fail gate in front of the evaluator chain.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::filters::{
    FilterOutcome, MovementFilter, MovementFilterConfig, PitchFilter, PitchFilterConfig,
    PrimeFilter, TrackingQualityFilter,
};
use crate::frame::Frame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Seconds since the last acceptance after which any frame is let through.
    pub force_accept_after_s: f64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            force_accept_after_s: 6.0,
        }
    }
}

/// How a frame got through the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Every filter accepted the frame.
    Passed,
    /// Filters were bypassed because nothing was accepted for too long.
    ForceAccepted,
    Rejected(crate::filters::RejectionReason),
}

impl AdmissionDecision {
    pub fn outcome(&self) -> FilterOutcome {
        match self {
            AdmissionDecision::Passed | AdmissionDecision::ForceAccepted => FilterOutcome::Accepted,
            AdmissionDecision::Rejected(reason) => FilterOutcome::Rejected(*reason),
        }
    }
}

/// Ordered list of prime filters with a force-accept escape valve.
pub struct FrameAdmissionGuard {
    filters: Vec<Box<dyn PrimeFilter>>,
    force_accept_after_s: f64,
    last_accepted_timestamp: Option<f64>,
}

impl FrameAdmissionGuard {
    /// Build a guard; filters are sorted by ascending cost (stable, so equal
    /// costs keep the given order).
    pub fn new(mut filters: Vec<Box<dyn PrimeFilter>>, config: &AdmissionConfig) -> Self {
        filters.sort_by_key(|f| f.cost());
        Self {
            filters,
            force_accept_after_s: config.force_accept_after_s,
            last_accepted_timestamp: None,
        }
    }

    /// The standard pitch / tracking-quality / movement chain.
    pub fn with_default_filters(
        pitch: &PitchFilterConfig,
        movement: &MovementFilterConfig,
        admission: &AdmissionConfig,
    ) -> Self {
        Self::new(
            vec![
                Box::new(MovementFilter::new(movement.clone())),
                Box::new(TrackingQualityFilter::new()),
                Box::new(PitchFilter::new(pitch)),
            ],
            admission,
        )
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn last_accepted_timestamp(&self) -> Option<f64> {
        self.last_accepted_timestamp
    }

    pub fn admit(&mut self, frame: &Frame) -> FilterOutcome {
        self.decide(frame).outcome()
    }

    /// Like [`admit`](Self::admit) but tells apart a force-accept.
    pub fn decide(&mut self, frame: &Frame) -> AdmissionDecision {
        if let Some(last) = self.last_accepted_timestamp {
            let elapsed = frame.timestamp_s - last;
            if elapsed > self.force_accept_after_s {
                info!(
                    "[Admission] force-accepting {} after {:.2}s without an accepted frame",
                    frame.id, elapsed
                );
                self.last_accepted_timestamp = Some(frame.timestamp_s);
                return AdmissionDecision::ForceAccepted;
            }
        }

        for filter in self.filters.iter_mut() {
            if let FilterOutcome::Rejected(reason) = filter.evaluate(frame) {
                debug!(
                    "[Admission] {} rejected by {} filter: {}",
                    frame.id,
                    filter.name(),
                    reason
                );
                return AdmissionDecision::Rejected(reason);
            }
        }

        self.last_accepted_timestamp = Some(frame.timestamp_s);
        AdmissionDecision::Passed
    }

    /// Start a new frame sequence: forget the last acceptance and all filter state.
    pub fn reset(&mut self) {
        self.last_accepted_timestamp = None;
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterCost, RejectionReason};
    use crate::frame::{FrameBuilder, LimitedReason, TrackingQuality};
    use crate::geometry::SE3;
    use nalgebra::{UnitQuaternion, Vector3};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records the order filters are invoked in.
    struct Probe {
        name: &'static str,
        cost: FilterCost,
        outcome: FilterOutcome,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl PrimeFilter for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn cost(&self) -> FilterCost {
            self.cost
        }
        fn evaluate(&mut self, _frame: &Frame) -> FilterOutcome {
            self.calls.lock().push(self.name);
            self.outcome
        }
    }

    fn default_guard() -> FrameAdmissionGuard {
        FrameAdmissionGuard::with_default_filters(
            &PitchFilterConfig::default(),
            &MovementFilterConfig::default(),
            &AdmissionConfig::default(),
        )
    }

    fn pose_x(x: f64) -> SE3 {
        SE3::new(UnitQuaternion::identity(), Vector3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_filters_sorted_by_cost() {
        let guard = default_guard();
        assert_eq!(
            guard.filter_names(),
            vec!["tracking_quality", "pitch", "movement"]
        );
    }

    #[test]
    fn test_first_rejection_short_circuits() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let probe = |name, cost, outcome| -> Box<dyn PrimeFilter> {
            Box::new(Probe {
                name,
                cost,
                outcome,
                calls: calls.clone(),
            })
        };
        let mut guard = FrameAdmissionGuard::new(
            vec![
                probe("expensive", FilterCost::Expensive, FilterOutcome::Accepted),
                probe(
                    "cheap",
                    FilterCost::Cheap,
                    FilterOutcome::Rejected(RejectionReason::MovingTooFast),
                ),
                probe("trivial", FilterCost::Trivial, FilterOutcome::Accepted),
            ],
            &AdmissionConfig::default(),
        );

        let frame = FrameBuilder::new(1, 0.0).build();
        assert_eq!(
            guard.admit(&frame),
            FilterOutcome::Rejected(RejectionReason::MovingTooFast)
        );
        assert_eq!(*calls.lock(), vec!["trivial", "cheap"]);
        assert_eq!(guard.last_accepted_timestamp(), None);
    }

    #[test]
    fn test_accept_records_timestamp() {
        let mut guard = default_guard();
        let frame = FrameBuilder::new(1, 3.5).build();
        assert!(guard.admit(&frame).is_accepted());
        assert_eq!(guard.last_accepted_timestamp(), Some(3.5));
    }

    #[test]
    fn test_force_accept_after_timeout() {
        let mut guard = default_guard();
        assert!(guard.admit(&FrameBuilder::new(1, 10.0).build()).is_accepted());

        // Fails every filter: limited tracking, pitch way down, no movement.
        let bad = |id, t| {
            FrameBuilder::new(id, t)
                .tracking(TrackingQuality::Limited(LimitedReason::ExcessiveMotion))
                .pitch(-1.5)
                .build()
        };

        assert!(!guard.admit(&bad(2, 15.0)).is_accepted());
        assert!(!guard.admit(&bad(3, 16.0)).is_accepted());
        assert_eq!(guard.decide(&bad(4, 17.0)), AdmissionDecision::ForceAccepted);
        assert_eq!(guard.last_accepted_timestamp(), Some(17.0));

        // Timer restarted by the force-accept.
        assert!(!guard.admit(&bad(5, 18.0)).is_accepted());
    }

    #[test]
    fn test_no_force_accept_before_first_acceptance() {
        let mut guard = default_guard();
        let frame = FrameBuilder::new(1, 100.0)
            .tracking(TrackingQuality::Unavailable)
            .build();
        assert_eq!(
            guard.admit(&frame),
            FilterOutcome::Rejected(RejectionReason::MovingTooLittle)
        );
    }

    #[test]
    fn test_reset_clears_stale_timestamp() {
        let mut guard = default_guard();
        guard.admit(&FrameBuilder::new(1, 0.0).build());
        guard.reset();
        assert_eq!(guard.last_accepted_timestamp(), None);

        // Would have been force-accepted without the reset.
        let frame = FrameBuilder::new(2, 50.0)
            .tracking(TrackingQuality::Unavailable)
            .build();
        assert!(!guard.admit(&frame).is_accepted());
    }

    #[test]
    fn test_replay_after_reset_is_identical() {
        let frames: Vec<Frame> = (0..40u64)
            .map(|i| {
                let t = i as f64 * 0.5;
                let tracking = if i % 7 == 3 {
                    TrackingQuality::Limited(LimitedReason::Relocalizing)
                } else {
                    TrackingQuality::Normal
                };
                FrameBuilder::new(i, t)
                    .pose(pose_x((i / 3) as f64 * 0.04))
                    .pitch(if i % 5 == 0 { 0.9 } else { 0.1 })
                    .tracking(tracking)
                    .build()
            })
            .collect();

        let mut guard = default_guard();
        let first: Vec<FilterOutcome> = frames.iter().map(|f| guard.admit(f)).collect();
        guard.reset();
        let second: Vec<FilterOutcome> = frames.iter().map(|f| guard.admit(f)).collect();

        assert_eq!(first, second);
        assert!(first.iter().any(|o| o.is_accepted()));
        assert!(first.iter().any(|o| !o.is_accepted()));
    }
}
