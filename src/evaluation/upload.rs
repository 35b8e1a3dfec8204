//! Hand-off tuple for the upload/localization collaborator.

use crate::evaluation::{WindowId, WindowResult};
use crate::frame::{CameraIntrinsics, SharedFrame};
use crate::geometry::SE3;

/// The winning frame of a window plus the metadata the localization request needs.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub window: WindowId,
    pub frame: SharedFrame,
    pub pose: SE3,
    pub intrinsics: CameraIntrinsics,
    pub score: f64,
}

impl UploadCandidate {
    /// `None` when the window closed without a scored frame.
    pub fn from_result(result: &WindowResult) -> Option<Self> {
        let frame = result.best_frame.clone()?;
        Some(Self {
            window: result.window,
            pose: frame.pose.clone(),
            intrinsics: frame.intrinsics,
            score: result.best_score,
            frame,
        })
    }
}
