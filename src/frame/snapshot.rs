//! The immutable per-tick frame snapshot.
//!
//! A `Frame` is produced once per capture tick by the tracking subsystem and
//! consumed read-only by the admission guard, the evaluator chain and the
//! rotation trackers. It is shared as [`SharedFrame`] so that the chain, the
//! delegate and an off-thread scorer can all hold it without copying.

use std::sync::Arc;

use crate::frame::{CameraIntrinsics, FrameId, SourceId, TrackingQuality};
use crate::geometry::SE3;

pub type SharedFrame = Arc<Frame>;

/// Device orientation as Euler angles, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    /// Positive when the camera tilts up.
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// Opaque handle to the image buffer held by the capture collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageHandle(pub u64);

#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    pub source: SourceId,
    /// Monotonic capture time in seconds.
    pub timestamp_s: f64,
    /// Camera-to-world pose (T_wc).
    pub pose: SE3,
    pub euler: EulerAngles,
    pub tracking: TrackingQuality,
    pub intrinsics: CameraIntrinsics,
    pub image: ImageHandle,
}

impl Frame {
    pub fn into_shared(self) -> SharedFrame {
        Arc::new(self)
    }
}

/// Builder used by producers and tests; unset fields get neutral defaults
/// (identity pose, level orientation, `Normal` tracking).
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    pub fn new(id: u64, timestamp_s: f64) -> Self {
        Self {
            frame: Frame {
                id: FrameId::new(id),
                source: SourceId::default(),
                timestamp_s,
                pose: SE3::identity(),
                euler: EulerAngles::default(),
                tracking: TrackingQuality::Normal,
                intrinsics: CameraIntrinsics::new(1000.0, 1000.0, 640.0, 360.0),
                image: ImageHandle(id),
            },
        }
    }

    pub fn source(mut self, source: SourceId) -> Self {
        self.frame.source = source;
        self
    }

    pub fn pose(mut self, pose: SE3) -> Self {
        self.frame.pose = pose;
        self
    }

    pub fn euler(mut self, euler: EulerAngles) -> Self {
        self.frame.euler = euler;
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.frame.euler.pitch = pitch;
        self
    }

    pub fn tracking(mut self, tracking: TrackingQuality) -> Self {
        self.frame.tracking = tracking;
        self
    }

    pub fn intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.frame.intrinsics = intrinsics;
        self
    }

    pub fn image(mut self, image: ImageHandle) -> Self {
        self.frame.image = image;
        self
    }

    pub fn build(self) -> Frame {
        self.frame
    }

    pub fn shared(self) -> SharedFrame {
        Arc::new(self.frame)
    }
}
