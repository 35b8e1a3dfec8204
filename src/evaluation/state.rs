//! Evaluator chain state machine.

/// State of the frame evaluator chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorState {
    /// No window open; the next admitted frame opens one.
    Idle,
    /// A window is open and collecting scored frames.
    EvaluatingWindow,
}

impl Default for EvaluatorState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Why an evaluation window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The configured window duration elapsed.
    DurationElapsed,
    /// The best score exceeded the high-quality threshold.
    HighQuality,
    /// Closed by an external finalize signal.
    Finalized,
}
