//! Pinhole camera intrinsics attached to every frame.

use nalgebra::Matrix3;

/// Intrinsic calibration: focal lengths and principal point, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// The 3x3 K matrix, `(u, v, 1) = K (x/z, y/z, 1)`.
    #[rustfmt::skip]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0,     self.cx,
            0.0,     self.fy, self.cy,
            0.0,     0.0,     1.0,
        )
    }

    pub fn from_matrix(k: &Matrix3<f64>) -> Self {
        Self {
            fx: k[(0, 0)],
            fy: k[(1, 1)],
            cx: k[(0, 2)],
            cy: k[(1, 2)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_layout() {
        let intr = CameraIntrinsics::new(1400.0, 1410.0, 960.0, 540.0);
        let k = intr.to_matrix();
        assert_eq!(k[(0, 0)], 1400.0);
        assert_eq!(k[(1, 1)], 1410.0);
        assert_eq!(k[(0, 2)], 960.0);
        assert_eq!(k[(1, 2)], 540.0);
        assert_eq!(k[(2, 2)], 1.0);
        assert_eq!(CameraIntrinsics::from_matrix(&k), intr);
    }
}
