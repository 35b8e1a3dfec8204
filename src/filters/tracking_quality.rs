//! Tracking-quality filter: only `Normal` tracking is worth localizing.

use crate::filters::{FilterCost, FilterOutcome, PrimeFilter, RejectionReason};
use crate::frame::{Frame, LimitedReason, TrackingQuality};

#[derive(Debug, Default)]
pub struct TrackingQualityFilter;

impl TrackingQualityFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn check(quality: TrackingQuality) -> FilterOutcome {
        match quality {
            TrackingQuality::Normal => FilterOutcome::Accepted,
            TrackingQuality::Limited(LimitedReason::Initializing)
            | TrackingQuality::Limited(LimitedReason::Relocalizing)
            | TrackingQuality::Unavailable => {
                FilterOutcome::Rejected(RejectionReason::MovingTooLittle)
            }
            TrackingQuality::Limited(LimitedReason::ExcessiveMotion) => {
                FilterOutcome::Rejected(RejectionReason::MovingTooFast)
            }
            TrackingQuality::Limited(LimitedReason::InsufficientFeatures) => {
                FilterOutcome::Rejected(RejectionReason::InsufficientFeatures)
            }
        }
    }
}

impl PrimeFilter for TrackingQualityFilter {
    fn name(&self) -> &'static str {
        "tracking_quality"
    }

    fn cost(&self) -> FilterCost {
        FilterCost::Trivial
    }

    fn evaluate(&mut self, frame: &Frame) -> FilterOutcome {
        Self::check(frame.tracking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_mapping() {
        use LimitedReason::*;

        let cases = [
            (TrackingQuality::Normal, None),
            (
                TrackingQuality::Limited(Initializing),
                Some(RejectionReason::MovingTooLittle),
            ),
            (
                TrackingQuality::Limited(Relocalizing),
                Some(RejectionReason::MovingTooLittle),
            ),
            (
                TrackingQuality::Unavailable,
                Some(RejectionReason::MovingTooLittle),
            ),
            (
                TrackingQuality::Limited(ExcessiveMotion),
                Some(RejectionReason::MovingTooFast),
            ),
            (
                TrackingQuality::Limited(InsufficientFeatures),
                Some(RejectionReason::InsufficientFeatures),
            ),
        ];

        for (quality, expected) in cases {
            assert_eq!(TrackingQualityFilter::check(quality).rejection(), expected);
        }
    }
}
