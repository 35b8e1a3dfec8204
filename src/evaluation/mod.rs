//! Frame evaluator chain: scoring admitted frames within timed windows and
//! keeping the best one per window for upload.

pub mod chain;
pub mod delegate;
pub mod scoring;
pub mod state;
pub mod upload;
pub mod window;
pub mod worker;

pub use chain::{EvaluatorConfig, FrameEvaluatorChain, IntakeOutcome, ScoreDisposition};
pub use delegate::{EvaluatorDelegate, EvaluatorEvent, NoopDelegate};
pub use scoring::{FrameScorer, ScoreError, validate_score};
pub use state::{CloseReason, EvaluatorState};
pub use upload::UploadCandidate;
pub use window::{EvaluationWindow, ScoreTicket, WindowId, WindowResult};
pub use worker::{ScoreResponse, ScoringWorker};
