//! Per-session counters for analytics and the replay summary.

use std::collections::BTreeMap;

use crate::filters::RejectionReason;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub frames_seen: usize,
    pub frames_admitted: usize,
    pub frames_force_accepted: usize,
    pub frames_other_session: usize,
    /// Admission and scoring rejections, by reason.
    pub rejections: BTreeMap<RejectionReason, usize>,
    pub windows_finished: usize,
    pub windows_with_best: usize,
}

impl SessionStats {
    pub fn record_rejection(&mut self, reason: RejectionReason) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    pub fn rejections_for(&self, reason: RejectionReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Most frequent rejection reason; ties go to the earlier reason.
    pub fn dominant_rejection(&self) -> Option<RejectionReason> {
        self.rejections
            .iter()
            .fold(None, |best: Option<(RejectionReason, usize)>, (&reason, &count)| {
                match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((reason, count)),
                }
            })
            .map(|(reason, _)| reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_rejection() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.dominant_rejection(), None);

        stats.record_rejection(RejectionReason::MovingTooLittle);
        stats.record_rejection(RejectionReason::PitchTooHigh);
        stats.record_rejection(RejectionReason::MovingTooLittle);
        assert_eq!(stats.rejections_for(RejectionReason::MovingTooLittle), 2);
        assert_eq!(stats.rejections_for(RejectionReason::Unknown), 0);
        assert_eq!(
            stats.dominant_rejection(),
            Some(RejectionReason::MovingTooLittle)
        );

        stats.record_rejection(RejectionReason::PitchTooHigh);
        assert_eq!(stats.dominant_rejection(), Some(RejectionReason::PitchTooHigh));
    }
}
