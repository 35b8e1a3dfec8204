//! Localization session: owns one admission guard, one evaluator chain and
//! one orientation spread accumulator for a single frame sequence.
//!
//! The host owns the tracking-subsystem callback and calls
//! [`LocalizationSession::process_frame`] once per capture tick, from a single
//! thread. Scoring either happens inline or on a [`ScoringWorker`] whose
//! results are folded back in by [`LocalizationSession::drain_scores`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::admission::{AdmissionDecision, FrameAdmissionGuard};
use crate::evaluation::{
    EvaluatorDelegate, FrameEvaluatorChain, FrameScorer, IntakeOutcome, ScoreDisposition,
    ScoreTicket, ScoringWorker, UploadCandidate, WindowResult,
};
use crate::evaluation::worker::DEFAULT_QUEUE_CAPACITY;
use crate::filters::{BehaviorRequest, RejectionReason};
use crate::frame::SharedFrame;
use crate::rotation::OrientationSpread;
use crate::session::{SelectorConfig, SessionStats, SharedConfig};

/// What the session did with a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameDisposition {
    /// Turned away by admission.
    Rejected(RejectionReason),
    /// Admitted, but a window for another source is open.
    OtherSessionActive,
    /// Admitted and scored inline.
    Scored(ScoreDisposition),
    /// Admitted and handed to the scoring worker.
    Submitted(ScoreTicket),
}

pub struct LocalizationSession {
    config: SelectorConfig,
    shared_config: Option<SharedConfig>,
    guard: FrameAdmissionGuard,
    chain: FrameEvaluatorChain,
    spread: OrientationSpread,
    scorer: Arc<dyn FrameScorer>,
    worker: Option<ScoringWorker>,
    stats: SessionStats,
    finished: Vec<WindowResult>,
    last_rejection: Option<RejectionReason>,
}

impl LocalizationSession {
    pub fn new(
        config: SelectorConfig,
        scorer: Arc<dyn FrameScorer>,
        delegate: Box<dyn EvaluatorDelegate>,
    ) -> Self {
        let guard = build_guard(&config);
        let chain = FrameEvaluatorChain::new(config.evaluator.clone(), delegate);
        Self {
            config,
            shared_config: None,
            guard,
            chain,
            spread: OrientationSpread::new(),
            scorer,
            worker: None,
            stats: SessionStats::default(),
            finished: Vec::new(),
            last_rejection: None,
        }
    }

    /// Session that re-reads `shared` on every [`restart`](Self::restart).
    pub fn with_shared_config(
        shared: SharedConfig,
        scorer: Arc<dyn FrameScorer>,
        delegate: Box<dyn EvaluatorDelegate>,
    ) -> Self {
        let mut session = Self::new(shared.snapshot(), scorer, delegate);
        session.shared_config = Some(shared);
        session
    }

    /// Start the scoring thread used by
    /// [`process_frame_async`](Self::process_frame_async).
    pub fn spawn_scoring_worker(&mut self, queue_capacity: usize) {
        self.worker = Some(ScoringWorker::spawn(self.scorer.clone(), queue_capacity));
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn spread(&self) -> &OrientationSpread {
        &self.spread
    }

    pub fn chain(&self) -> &FrameEvaluatorChain {
        &self.chain
    }

    /// Entry point for one capture tick, scoring inline.
    pub fn process_frame(&mut self, frame: impl Into<SharedFrame>) -> FrameDisposition {
        let frame = match self.admit(frame.into()) {
            Ok(frame) => frame,
            Err(reason) => return FrameDisposition::Rejected(reason),
        };
        let disposition = self.score_inline(frame);
        self.collect_finished();
        disposition
    }

    /// Like [`process_frame`](Self::process_frame) but hands the frame to the
    /// scoring worker, spawning one on first use. Results are applied by
    /// [`drain_scores`](Self::drain_scores).
    pub fn process_frame_async(&mut self, frame: impl Into<SharedFrame>) -> FrameDisposition {
        if self.worker.is_none() {
            self.spawn_scoring_worker(DEFAULT_QUEUE_CAPACITY);
        }
        let frame: SharedFrame = frame.into();
        // Results already back belong to the open window, which this frame
        // may be about to close.
        self.apply_buffered_scores(frame.timestamp_s);
        let frame = match self.admit(frame) {
            Ok(frame) => frame,
            Err(reason) => return FrameDisposition::Rejected(reason),
        };
        let disposition = self.submit(frame);
        self.collect_finished();
        disposition
    }

    fn admit(&mut self, frame: SharedFrame) -> Result<SharedFrame, RejectionReason> {
        self.stats.frames_seen += 1;

        // Orientation analytics see every frame, admitted or not.
        self.spread.update(&frame.euler, frame.tracking);

        match self.guard.decide(&frame) {
            AdmissionDecision::Rejected(reason) => {
                self.stats.record_rejection(reason);
                self.last_rejection = Some(reason);
                self.chain.report_filter_rejection(&frame, reason);
                self.collect_finished();
                return Err(reason);
            }
            AdmissionDecision::ForceAccepted => self.stats.frames_force_accepted += 1,
            AdmissionDecision::Passed => {}
        }
        self.stats.frames_admitted += 1;
        self.last_rejection = None;
        Ok(frame)
    }

    fn score_inline(&mut self, frame: SharedFrame) -> FrameDisposition {
        let now = frame.timestamp_s;
        match self.chain.intake(frame.clone()) {
            IntakeOutcome::OtherSessionActive => {
                self.stats.frames_other_session += 1;
                FrameDisposition::OtherSessionActive
            }
            IntakeOutcome::Pending(ticket) => {
                let result = self.scorer.score(&frame);
                let disposition = self.chain.record_score(ticket, result, now);
                if let ScoreDisposition::Rejected(reason) = disposition {
                    self.stats.record_rejection(reason);
                }
                FrameDisposition::Scored(disposition)
            }
        }
    }

    fn submit(&mut self, frame: SharedFrame) -> FrameDisposition {
        let now = frame.timestamp_s;
        let ticket = match self.chain.intake(frame.clone()) {
            IntakeOutcome::OtherSessionActive => {
                self.stats.frames_other_session += 1;
                return FrameDisposition::OtherSessionActive;
            }
            IntakeOutcome::Pending(ticket) => ticket,
        };

        let Some(ref worker) = self.worker else {
            return FrameDisposition::Submitted(ticket);
        };
        if let Err(err) = worker.submit(ticket, frame) {
            // Resolve right away so the frame does not sit pending until close.
            let disposition = self.chain.record_score(ticket, Err(err), now);
            if let ScoreDisposition::Rejected(reason) = disposition {
                self.stats.record_rejection(reason);
            }
            return FrameDisposition::Scored(disposition);
        }
        FrameDisposition::Submitted(ticket)
    }

    /// Fold in scores that arrived from the worker, then close the window if
    /// its time is up. Buffered results count toward the window they were
    /// issued for even when collected after its deadline.
    pub fn drain_scores(&mut self, now: f64) -> usize {
        let count = self.apply_buffered_scores(now);
        self.chain.poll(now);
        self.collect_finished();
        count
    }

    /// Wall-clock tick: close the window if its time is up.
    pub fn poll(&mut self, now: f64) -> bool {
        self.apply_buffered_scores(now);
        let closed = self.chain.poll(now);
        self.collect_finished();
        closed
    }

    fn apply_buffered_scores(&mut self, now: f64) -> usize {
        let responses = match self.worker {
            Some(ref worker) => worker.drain(),
            None => return 0,
        };
        let count = responses.len();
        for response in responses {
            let disposition = self.chain.apply_score(response.ticket, response.result, now);
            if let ScoreDisposition::Rejected(reason) = disposition {
                self.stats.record_rejection(reason);
            }
        }
        count
    }

    /// External finalize signal for the open window.
    pub fn finalize(&mut self, now: f64) -> bool {
        self.apply_buffered_scores(now);
        let closed = self.chain.finalize(now);
        self.collect_finished();
        closed
    }

    /// Closed windows since the last call.
    pub fn take_window_results(&mut self) -> Vec<WindowResult> {
        std::mem::take(&mut self.finished)
    }

    /// Best frames ready for the upload collaborator.
    pub fn take_upload_candidates(&mut self) -> Vec<UploadCandidate> {
        self.take_window_results()
            .iter()
            .filter_map(UploadCandidate::from_result)
            .collect()
    }

    /// What to ask of the user right now: the last admission rejection wins,
    /// then the orientation-spread prompt.
    pub fn behavior_request(&self) -> Option<BehaviorRequest> {
        self.last_rejection
            .map(|reason| reason.behavior_request())
            .or_else(|| self.spread.suggested_request(&self.config.spread_prompts))
    }

    /// Start a new frame sequence.
    ///
    /// Guard, chain and spread are reset in place, so no window, force-accept
    /// timer or filter reference from the previous sequence survives. A
    /// shared config is re-read here and only here.
    pub fn restart(&mut self) {
        if let Some(ref shared) = self.shared_config {
            let config = shared.snapshot();
            if config != self.config {
                info!("[Session] applying updated configuration on restart");
                self.guard = build_guard(&config);
                self.chain.reconfigure(config.evaluator.clone());
                self.config = config;
            }
        }

        self.guard.reset();
        self.chain.reset();
        self.spread.reset();
        if let Some(ref worker) = self.worker {
            // Scores for the old windows are stale anyway.
            let dropped = worker.drain().len();
            if dropped > 0 {
                debug!("[Session] dropped {} in-flight scores on restart", dropped);
            }
        }
        self.stats = SessionStats::default();
        self.finished.clear();
        self.last_rejection = None;
        info!("[Session] restarted");
    }

    fn collect_finished(&mut self) {
        for result in self.chain.take_finished() {
            self.stats.windows_finished += 1;
            if result.best_frame.is_some() {
                self.stats.windows_with_best += 1;
            }
            self.finished.push(result);
        }
    }
}

fn build_guard(config: &SelectorConfig) -> FrameAdmissionGuard {
    FrameAdmissionGuard::with_default_filters(&config.pitch, &config.movement, &config.admission)
}
