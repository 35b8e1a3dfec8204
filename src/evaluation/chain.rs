//! Frame evaluator chain: windowed best-of-N selection.
//!
//! Admitted frames enter the current evaluation window and get a
//! [`ScoreTicket`]. Scores are recorded against tickets, possibly out of
//! order and from another thread's results; the best score wins regardless
//! of arrival order. A window closes when its duration elapses (driven by
//! the clock passed to `intake`/`record_score`/`poll`, never by waiting on a
//! scorer), when its best score exceeds the high-quality threshold, or on an
//! explicit `finalize`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::evaluation::{
    CloseReason, EvaluationWindow, EvaluatorDelegate, EvaluatorState, FrameScorer, ScoreError,
    ScoreTicket, WindowId, WindowResult, validate_score,
};
use crate::filters::RejectionReason;
use crate::frame::SharedFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Window length in seconds.
    pub window_duration_s: f64,
    /// Scores below this trigger `on_frame_below_min_threshold`.
    pub min_score: f64,
    /// A best score above this closes the window early.
    pub high_quality_score: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            window_duration_s: 1.0,
            min_score: 0.3,
            high_quality_score: 0.9,
        }
    }
}

/// What happened to a frame handed to [`FrameEvaluatorChain::intake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// In the window, waiting for its score.
    Pending(ScoreTicket),
    /// A window for another source is open.
    OtherSessionActive,
}

/// What a recorded score did to the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreDisposition {
    NewBest,
    BelowBest { best_score: f64 },
    /// The scorer failed or returned garbage.
    Rejected(RejectionReason),
    /// The ticket's window is no longer open, or the score was already recorded.
    Stale,
}

pub struct FrameEvaluatorChain {
    config: EvaluatorConfig,
    /// Applied when the current window closes.
    pending_config: Option<EvaluatorConfig>,
    delegate: Box<dyn EvaluatorDelegate>,
    state: EvaluatorState,
    window: Option<EvaluationWindow>,
    next_window_id: u64,
    finished: VecDeque<WindowResult>,
}

impl FrameEvaluatorChain {
    pub fn new(config: EvaluatorConfig, delegate: Box<dyn EvaluatorDelegate>) -> Self {
        Self {
            config,
            pending_config: None,
            delegate,
            state: EvaluatorState::Idle,
            window: None,
            next_window_id: 0,
            finished: VecDeque::new(),
        }
    }

    pub fn state(&self) -> EvaluatorState {
        self.state
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn current_window(&self) -> Option<&EvaluationWindow> {
        self.window.as_ref()
    }

    /// Replace the configuration. Takes effect immediately when idle,
    /// otherwise once the open window closes.
    pub fn reconfigure(&mut self, config: EvaluatorConfig) {
        if self.window.is_some() {
            self.pending_config = Some(config);
        } else {
            self.config = config;
        }
    }

    /// Forward an admission rejection to the delegate.
    pub fn report_filter_rejection(&mut self, frame: &SharedFrame, reason: RejectionReason) {
        self.delegate.on_frame_rejected_by_filter(frame, reason);
    }

    /// Bring an admitted frame into the current window, opening one if idle.
    ///
    /// The frame's timestamp is used as the clock: an expired window is
    /// closed first, so the frame starts the next window.
    pub fn intake(&mut self, frame: SharedFrame) -> IntakeOutcome {
        let now = frame.timestamp_s;
        self.poll(now);

        let mut window = match self.window.take() {
            Some(window) if window.source != frame.source => {
                debug!(
                    "[Evaluator] {} from {} turned away, {} owned by {}",
                    frame.id, frame.source, window.id, window.source
                );
                self.window = Some(window);
                self.delegate.on_frame_rejected_as_other_session_active(&frame);
                return IntakeOutcome::OtherSessionActive;
            }
            Some(window) => window,
            None => self.open_window(&frame, now),
        };

        let ticket = ScoreTicket {
            window: window.id,
            frame: frame.id,
        };
        window.pending.insert(frame.id, frame);
        self.window = Some(window);
        IntakeOutcome::Pending(ticket)
    }

    /// Apply a score result for a previously issued ticket.
    ///
    /// An expired window is closed first, so a score recorded after the
    /// deadline is stale. Use [`apply_score`](Self::apply_score) for results
    /// that were computed in time but are only now being collected.
    pub fn record_score(
        &mut self,
        ticket: ScoreTicket,
        result: Result<f64, ScoreError>,
        now: f64,
    ) -> ScoreDisposition {
        self.poll(now);
        self.apply_score(ticket, result, now)
    }

    /// Apply a score to the open window without checking its deadline.
    ///
    /// A high-quality score still closes the window, stamped with `now`.
    pub fn apply_score(
        &mut self,
        ticket: ScoreTicket,
        result: Result<f64, ScoreError>,
        now: f64,
    ) -> ScoreDisposition {
        let Some(window) = self.window.as_mut() else {
            debug!("[Evaluator] score for {} arrived after {} closed", ticket.frame, ticket.window);
            return ScoreDisposition::Stale;
        };
        if window.id != ticket.window {
            debug!("[Evaluator] score for {} arrived after {} closed", ticket.frame, ticket.window);
            return ScoreDisposition::Stale;
        }
        let Some(frame) = window.pending.remove(&ticket.frame) else {
            return ScoreDisposition::Stale;
        };

        let score = match validate_score(result) {
            Ok(score) => score,
            Err(err) => {
                warn!("[Evaluator] {} could not be scored: {}", frame.id, err);
                window.frames_rejected += 1;
                self.delegate
                    .on_frame_rejected_by_filter(&frame, RejectionReason::Unknown);
                return ScoreDisposition::Rejected(RejectionReason::Unknown);
            }
        };

        window.frames_scored += 1;
        let previous_best = window.best_score;
        let disposition = if window.offer(&frame, score) {
            self.delegate.on_new_best_frame(&frame);
            ScoreDisposition::NewBest
        } else {
            self.delegate.on_frame_below_best(&frame, previous_best);
            ScoreDisposition::BelowBest {
                best_score: previous_best,
            }
        };

        if score < self.config.min_score {
            self.delegate
                .on_frame_below_min_threshold(&frame, self.config.min_score);
        }

        if window.best_score > self.config.high_quality_score {
            self.close_window(CloseReason::HighQuality, now);
        }

        disposition
    }

    /// Intake a frame and score it synchronously with `scorer`.
    pub fn evaluate(&mut self, frame: SharedFrame, scorer: &dyn FrameScorer) -> IntakeOutcome {
        let now = frame.timestamp_s;
        let outcome = self.intake(frame.clone());
        if let IntakeOutcome::Pending(ticket) = outcome {
            let result = scorer.score(&frame);
            self.record_score(ticket, result, now);
        }
        outcome
    }

    /// Close the window if its duration has elapsed at `now`.
    pub fn poll(&mut self, now: f64) -> bool {
        let expired = self
            .window
            .as_ref()
            .is_some_and(|w| w.elapsed(now) >= self.config.window_duration_s);
        if expired {
            self.close_window(CloseReason::DurationElapsed, now);
        }
        expired
    }

    /// External close signal. Returns false when no window was open.
    pub fn finalize(&mut self, now: f64) -> bool {
        if self.window.is_none() {
            return false;
        }
        self.close_window(CloseReason::Finalized, now);
        true
    }

    /// Results of windows closed since the last call, oldest first.
    pub fn take_finished(&mut self) -> Vec<WindowResult> {
        self.finished.drain(..).collect()
    }

    /// Drop the open window without emitting it and forget finished results.
    ///
    /// Window ids keep increasing so scores for the dropped window stay stale.
    pub fn reset(&mut self) {
        if let Some(window) = self.window.take() {
            info!(
                "[Evaluator] discarding {} with {} pending frames on reset",
                window.id,
                window.pending_len()
            );
        }
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
        self.state = EvaluatorState::Idle;
        self.finished.clear();
    }

    fn open_window(&mut self, frame: &SharedFrame, now: f64) -> EvaluationWindow {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;

        debug!("[Evaluator] opening {} for {} at {:.3}s", id, frame.source, now);
        self.state = EvaluatorState::EvaluatingWindow;
        self.delegate.on_window_opened(now);
        EvaluationWindow::new(id, frame.source, now)
    }

    fn close_window(&mut self, reason: CloseReason, now: f64) {
        let Some(mut window) = self.window.take() else {
            return;
        };
        window.is_open = false;

        // Scores that never arrived count as unknown failures.
        let mut unresolved: Vec<SharedFrame> = window.pending.drain().map(|(_, f)| f).collect();
        unresolved.sort_by_key(|f| f.id);
        for frame in &unresolved {
            window.frames_rejected += 1;
            self.delegate
                .on_frame_rejected_by_filter(frame, RejectionReason::Unknown);
        }

        debug!(
            "[Evaluator] closing {} ({:?}) after {:.3}s: best={} score={:.3}, scored={}, rejected={}",
            window.id,
            reason,
            window.elapsed(now),
            window
                .best_frame
                .as_ref()
                .map(|f| f.id.to_string())
                .unwrap_or_else(|| "none".to_string()),
            window.best_score,
            window.frames_scored,
            window.frames_rejected
        );

        self.delegate.on_window_finished(window.best_frame.as_ref());
        self.finished
            .push_back(WindowResult::from_window(window, reason, now));
        self.state = EvaluatorState::Idle;

        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
    }
}
