//! Mapping from rejection reasons to what the user should do next.

use crate::filters::RejectionReason;

/// A user-facing request derived from a rejection or from orientation spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorRequest {
    TiltDown,
    TiltUp,
    SlowDown,
    PanAround,
    PointAtDetailedArea,
    ReportProblem,
    /// Not enough pitch variation yet; look up and down a little.
    TiltAround,
}

impl BehaviorRequest {
    pub fn prompt(&self) -> &'static str {
        match self {
            BehaviorRequest::TiltDown => "Tilt your phone down",
            BehaviorRequest::TiltUp => "Tilt your phone up",
            BehaviorRequest::SlowDown => "Move more slowly",
            BehaviorRequest::PanAround => "Pan around slowly",
            BehaviorRequest::PointAtDetailedArea => "Point at an area with more detail",
            BehaviorRequest::ReportProblem => "Something went wrong, please report a problem",
            BehaviorRequest::TiltAround => "Tilt your phone up and down",
        }
    }
}

impl RejectionReason {
    pub fn behavior_request(&self) -> BehaviorRequest {
        match self {
            RejectionReason::PitchTooHigh => BehaviorRequest::TiltDown,
            RejectionReason::PitchTooLow => BehaviorRequest::TiltUp,
            RejectionReason::MovingTooFast => BehaviorRequest::SlowDown,
            RejectionReason::MovingTooLittle => BehaviorRequest::PanAround,
            RejectionReason::InsufficientFeatures => BehaviorRequest::PointAtDetailedArea,
            RejectionReason::Unknown => BehaviorRequest::ReportProblem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_matches_prompts() {
        assert_eq!(
            RejectionReason::PitchTooHigh.behavior_request(),
            BehaviorRequest::TiltDown
        );
        assert_eq!(
            RejectionReason::MovingTooLittle.behavior_request(),
            BehaviorRequest::PanAround
        );
        assert_eq!(
            RejectionReason::Unknown.behavior_request(),
            BehaviorRequest::ReportProblem
        );
    }

    #[test]
    fn test_every_reason_has_a_prompt() {
        for reason in RejectionReason::ALL {
            assert!(!reason.behavior_request().prompt().is_empty());
        }
    }
}
