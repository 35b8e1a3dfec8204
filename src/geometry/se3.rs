//! Rigid-body transform (rotation + translation) used for frame poses.

use nalgebra::{Matrix4, Rotation3, UnitQuaternion, Vector3};

/// A rigid transform in SE(3). Frame poses are camera-to-world (T_wc).
#[derive(Debug, Clone, PartialEq)]
pub struct SE3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl SE3 {
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Build from a w-first quaternion. The quaternion is normalized.
    pub fn from_quaternion(qw: f64, qx: f64, qy: f64, qz: f64, translation: Vector3<f64>) -> Self {
        let rotation =
            UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(qw, qx, qy, qz));
        Self {
            rotation,
            translation,
        }
    }

    /// Build from a 4x4 homogeneous matrix. The upper-left block must be a rotation.
    pub fn from_matrix(m: Matrix4<f64>) -> Self {
        let r = m.fixed_view::<3, 3>(0, 0).into_owned();
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&r));
        let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        Self {
            rotation,
            translation,
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = self.rotation.to_homogeneous();
        m[(0, 3)] = self.translation.x;
        m[(1, 3)] = self.translation.y;
        m[(2, 3)] = self.translation.z;
        m
    }

    /// `self * other`.
    pub fn compose(&self, other: &SE3) -> SE3 {
        SE3 {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    pub fn inverse(&self) -> SE3 {
        let rotation = self.rotation.inverse();
        SE3 {
            translation: -(rotation * self.translation),
            rotation,
        }
    }

    /// Transform of `self` expressed in the frame of `reference`:
    /// `reference⁻¹ * self`.
    pub fn relative_to(&self, reference: &SE3) -> SE3 {
        reference.inverse().compose(self)
    }

    /// Euclidean distance between the two positions.
    pub fn translation_distance_to(&self, other: &SE3) -> f64 {
        (self.translation - other.translation).norm()
    }

    /// Geodesic angle (radians, in [0, π]) between the two orientations.
    pub fn rotation_angle_to(&self, other: &SE3) -> f64 {
        self.rotation.angle_to(&other.rotation)
    }

    /// Interpolate towards `other`: slerp on orientation, lerp on position.
    ///
    /// `t` is clamped to [0, 1]. Antipodal orientations fall back to `self`'s
    /// rotation up to `t = 0.5` and `other`'s beyond, since slerp is undefined
    /// there.
    pub fn interpolate(&self, other: &SE3, t: f64) -> SE3 {
        let t = t.clamp(0.0, 1.0);
        let rotation = self
            .rotation
            .try_slerp(&other.rotation, t, 1e-9)
            .unwrap_or(if t <= 0.5 {
                self.rotation
            } else {
                other.rotation
            });
        SE3 {
            rotation,
            translation: self.translation.lerp(&other.translation, t),
        }
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// A pose sampled at a point in time (seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct TimedPose {
    pub timestamp_s: f64,
    pub pose: SE3,
}

impl TimedPose {
    pub fn new(timestamp_s: f64, pose: SE3) -> Self {
        Self { timestamp_s, pose }
    }

    /// Pose at `timestamp_s` between two samples.
    ///
    /// Returns `None` when the timestamp is outside `[a, b]` or the samples
    /// are not strictly ordered in time.
    pub fn interpolate_at(a: &TimedPose, b: &TimedPose, timestamp_s: f64) -> Option<SE3> {
        let span = b.timestamp_s - a.timestamp_s;
        if !(span > 0.0) || timestamp_s < a.timestamp_s || timestamp_s > b.timestamp_s {
            return None;
        }
        let t = (timestamp_s - a.timestamp_s) / span;
        Some(a.pose.interpolate(&b.pose, t))
    }
}
