//! Evaluation window bookkeeping.

use std::collections::HashMap;

use crate::evaluation::CloseReason;
use crate::frame::{FrameId, SharedFrame, SourceId};

/// Identifier of an evaluation window, unique for the lifetime of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Receipt for a frame awaiting its score.
///
/// Scores are matched back by ticket, so they may arrive in any order.
/// A ticket whose window has closed is stale and its score is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreTicket {
    pub window: WindowId,
    pub frame: FrameId,
}

/// Mutable state of the window currently being evaluated.
#[derive(Debug)]
pub struct EvaluationWindow {
    pub id: WindowId,
    /// Capture source that owns this window.
    pub source: SourceId,
    pub start_time: f64,
    pub best_frame: Option<SharedFrame>,
    pub best_score: f64,
    pub is_open: bool,
    /// Frames admitted into the window whose score has not arrived yet.
    pub(crate) pending: HashMap<FrameId, SharedFrame>,
    pub frames_scored: usize,
    pub frames_rejected: usize,
}

impl EvaluationWindow {
    pub fn new(id: WindowId, source: SourceId, start_time: f64) -> Self {
        Self {
            id,
            source,
            start_time,
            best_frame: None,
            best_score: f64::NEG_INFINITY,
            is_open: true,
            pending: HashMap::new(),
            frames_scored: 0,
            frames_rejected: 0,
        }
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.start_time
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take the best frame if `score` beats it. Ties keep the earlier frame.
    pub(crate) fn offer(&mut self, frame: &SharedFrame, score: f64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            self.best_frame = Some(frame.clone());
            true
        } else {
            false
        }
    }
}

/// Summary of a closed window, handed to the upload collaborator.
#[derive(Debug, Clone)]
pub struct WindowResult {
    pub window: WindowId,
    pub source: SourceId,
    pub best_frame: Option<SharedFrame>,
    /// `NEG_INFINITY` when no frame was scored.
    pub best_score: f64,
    pub opened_at: f64,
    pub closed_at: f64,
    pub close_reason: CloseReason,
    pub frames_scored: usize,
    pub frames_rejected: usize,
}

impl WindowResult {
    pub(crate) fn from_window(window: EvaluationWindow, reason: CloseReason, now: f64) -> Self {
        Self {
            window: window.id,
            source: window.source,
            best_frame: window.best_frame,
            best_score: window.best_score,
            opened_at: window.start_time,
            closed_at: now,
            close_reason: reason,
            frames_scored: window.frames_scored,
            frames_rejected: window.frames_rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuilder;

    #[test]
    fn test_offer_keeps_strictly_better() {
        let mut window = EvaluationWindow::new(WindowId(1), SourceId::default(), 0.0);
        let a = FrameBuilder::new(1, 0.0).shared();
        let b = FrameBuilder::new(2, 0.1).shared();

        assert!(window.offer(&a, 0.5));
        assert!(!window.offer(&b, 0.5));
        assert_eq!(window.best_frame.as_ref().map(|f| f.id), Some(FrameId(1)));
        assert!(window.offer(&b, 0.6));
        assert_eq!(window.best_score, 0.6);
    }

    #[test]
    fn test_window_id_display() {
        assert_eq!(WindowId(3).to_string(), "W3");
    }
}
