//! Continuous rotation tracking and orientation spread analytics.
//!
//! Fed with every frame's orientation, independent of admission.

pub mod continuity;
pub mod spread;

pub use continuity::RotationContinuityTracker;
pub use spread::{AxisSpread, OrientationSpread, SpreadPromptConfig};
