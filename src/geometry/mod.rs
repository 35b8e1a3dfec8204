//! Geometry utilities: angle wrapping and SE3 poses.

pub mod angle;
pub mod se3;

pub use angle::{deg_to_rad, normalize, rad_to_deg, shortest_difference};
pub use se3::{SE3, TimedPose};
