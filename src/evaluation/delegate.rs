//! Lifecycle notifications emitted by the evaluator chain.

use crossbeam_channel::Sender;

use crate::filters::RejectionReason;
use crate::frame::{FrameId, SharedFrame};

/// Receiver of evaluator lifecycle events (UI, analytics).
///
/// All methods default to doing nothing so implementors only override what
/// they care about. Calls happen on the intake thread, in event order.
pub trait EvaluatorDelegate: Send {
    fn on_window_opened(&mut self, _start_time: f64) {}

    fn on_frame_rejected_by_filter(&mut self, _frame: &SharedFrame, _reason: RejectionReason) {}

    fn on_frame_rejected_as_other_session_active(&mut self, _frame: &SharedFrame) {}

    fn on_new_best_frame(&mut self, _frame: &SharedFrame) {}

    fn on_frame_below_best(&mut self, _frame: &SharedFrame, _best_score: f64) {}

    fn on_frame_below_min_threshold(&mut self, _frame: &SharedFrame, _min_threshold: f64) {}

    fn on_window_finished(&mut self, _best_frame: Option<&SharedFrame>) {}
}

/// Delegate that ignores every event.
#[derive(Debug, Default)]
pub struct NoopDelegate;

impl EvaluatorDelegate for NoopDelegate {}

/// Owned form of a delegate call, for shipping events to another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatorEvent {
    WindowOpened { start_time: f64 },
    FrameRejectedByFilter { frame: FrameId, reason: RejectionReason },
    FrameRejectedAsOtherSessionActive { frame: FrameId },
    NewBestFrame { frame: FrameId },
    FrameBelowBest { frame: FrameId, best_score: f64 },
    FrameBelowMinThreshold { frame: FrameId, min_threshold: f64 },
    WindowFinished { best_frame: Option<FrameId> },
}

/// Forward every event over a channel. A disconnected receiver is ignored.
impl EvaluatorDelegate for Sender<EvaluatorEvent> {
    fn on_window_opened(&mut self, start_time: f64) {
        let _ = self.send(EvaluatorEvent::WindowOpened { start_time });
    }

    fn on_frame_rejected_by_filter(&mut self, frame: &SharedFrame, reason: RejectionReason) {
        let _ = self.send(EvaluatorEvent::FrameRejectedByFilter {
            frame: frame.id,
            reason,
        });
    }

    fn on_frame_rejected_as_other_session_active(&mut self, frame: &SharedFrame) {
        let _ = self.send(EvaluatorEvent::FrameRejectedAsOtherSessionActive { frame: frame.id });
    }

    fn on_new_best_frame(&mut self, frame: &SharedFrame) {
        let _ = self.send(EvaluatorEvent::NewBestFrame { frame: frame.id });
    }

    fn on_frame_below_best(&mut self, frame: &SharedFrame, best_score: f64) {
        let _ = self.send(EvaluatorEvent::FrameBelowBest {
            frame: frame.id,
            best_score,
        });
    }

    fn on_frame_below_min_threshold(&mut self, frame: &SharedFrame, min_threshold: f64) {
        let _ = self.send(EvaluatorEvent::FrameBelowMinThreshold {
            frame: frame.id,
            min_threshold,
        });
    }

    fn on_window_finished(&mut self, best_frame: Option<&SharedFrame>) {
        let _ = self.send(EvaluatorEvent::WindowFinished {
            best_frame: best_frame.map(|f| f.id),
        });
    }
}
