//! Prime filters: cheap, composable per-frame predicates.
//!
//! Every filter answers one question about a single frame and returns a
//! [`FilterOutcome`]. The admission guard runs them as an ordered list,
//! cheapest first, stopping at the first rejection.

pub mod behavior;
pub mod movement;
pub mod outcome;
pub mod pitch;
pub mod tracking_quality;

pub use behavior::BehaviorRequest;
pub use movement::{MovementFilter, MovementFilterConfig};
pub use outcome::{FilterOutcome, RejectionReason};
pub use pitch::{PitchFilter, PitchFilterConfig};
pub use tracking_quality::TrackingQualityFilter;

use crate::frame::Frame;

/// Relative computational cost of a filter, used to order the guard's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterCost {
    /// A field comparison.
    Trivial,
    Cheap,
    /// Pose arithmetic or similar.
    Moderate,
    Expensive,
}

/// A single admission predicate.
///
/// Filters are stateless unless they document otherwise; stateful filters
/// must clear their state in `reset` so a new frame sequence starts clean.
pub trait PrimeFilter: Send {
    fn name(&self) -> &'static str;

    fn cost(&self) -> FilterCost;

    fn evaluate(&mut self, frame: &Frame) -> FilterOutcome;

    fn reset(&mut self) {}
}
