//! Filter outcomes. Rejections are data, never errors.

/// Why a frame was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RejectionReason {
    PitchTooHigh,
    PitchTooLow,
    MovingTooFast,
    MovingTooLittle,
    InsufficientFeatures,
    Unknown,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 6] = [
        RejectionReason::PitchTooHigh,
        RejectionReason::PitchTooLow,
        RejectionReason::MovingTooFast,
        RejectionReason::MovingTooLittle,
        RejectionReason::InsufficientFeatures,
        RejectionReason::Unknown,
    ];
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RejectionReason::PitchTooHigh => "pitch too high",
            RejectionReason::PitchTooLow => "pitch too low",
            RejectionReason::MovingTooFast => "moving too fast",
            RejectionReason::MovingTooLittle => "moving too little",
            RejectionReason::InsufficientFeatures => "insufficient features",
            RejectionReason::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Result of running a frame through a filter or the admission guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Accepted,
    Rejected(RejectionReason),
}

impl FilterOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterOutcome::Accepted)
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            FilterOutcome::Accepted => None,
            FilterOutcome::Rejected(reason) => Some(*reason),
        }
    }
}
