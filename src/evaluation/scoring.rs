//! Scoring function interface consumed by the evaluator chain.

use thiserror::Error;

use crate::frame::Frame;

/// Failure of the external scoring function. Absorbed by the chain as an
/// `Unknown` rejection; never aborts a window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("scoring failed: {0}")]
    Failed(String),
    #[error("score {0} outside [0, 1]")]
    OutOfRange(f64),
    #[error("score is not a finite number")]
    NotFinite,
    #[error("scoring request abandoned: {0}")]
    Abandoned(String),
}

/// Scores a frame in [0, 1]; higher is better.
///
/// Implementations may be slow (e.g. model inference) and are allowed to run
/// off the intake thread, see [`ScoringWorker`](super::ScoringWorker).
pub trait FrameScorer: Send + Sync {
    fn score(&self, frame: &Frame) -> Result<f64, ScoreError>;
}

impl<F> FrameScorer for F
where
    F: Fn(&Frame) -> Result<f64, ScoreError> + Send + Sync,
{
    fn score(&self, frame: &Frame) -> Result<f64, ScoreError> {
        self(frame)
    }
}

/// Check that a scorer's answer is usable.
pub fn validate_score(result: Result<f64, ScoreError>) -> Result<f64, ScoreError> {
    let score = result?;
    if !score.is_finite() {
        return Err(ScoreError::NotFinite);
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(ScoreError::OutOfRange(score));
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuilder;

    #[test]
    fn test_validate_score() {
        assert_eq!(validate_score(Ok(0.0)), Ok(0.0));
        assert_eq!(validate_score(Ok(1.0)), Ok(1.0));
        assert_eq!(validate_score(Ok(1.2)), Err(ScoreError::OutOfRange(1.2)));
        assert_eq!(validate_score(Ok(-0.1)), Err(ScoreError::OutOfRange(-0.1)));
        assert_eq!(validate_score(Ok(f64::NAN)), Err(ScoreError::NotFinite));
        assert_eq!(
            validate_score(Err(ScoreError::Failed("model".into()))),
            Err(ScoreError::Failed("model".into()))
        );
    }

    #[test]
    fn test_closure_scorer() {
        let scorer = |frame: &Frame| -> Result<f64, ScoreError> { Ok(frame.timestamp_s / 10.0) };
        let frame = FrameBuilder::new(1, 5.0).build();
        assert_eq!(scorer.score(&frame), Ok(0.5));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ScoreError::OutOfRange(1.5).to_string(),
            "score 1.5 outside [0, 1]"
        );
    }
}
