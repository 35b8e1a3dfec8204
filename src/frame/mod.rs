//! Frame data model: the snapshot handed over by the tracking subsystem.

pub mod camera;
pub mod ids;
pub mod snapshot;
pub mod tracking_quality;

pub use camera::CameraIntrinsics;
pub use ids::{FrameId, SourceId};
pub use snapshot::{EulerAngles, Frame, FrameBuilder, ImageHandle, SharedFrame};
pub use tracking_quality::{LimitedReason, TrackingQuality};
