//! Angle helpers shared by the pitch filter and the rotation trackers.
//!
//! All angles inside the crate are radians. Degrees only appear at the
//! configuration boundary and in user-facing output.

use std::f64::consts::{PI, TAU};

/// Wrap an angle into the half-open interval (-π, π].
///
/// Values already inside the interval are returned untouched, which makes
/// the function exactly idempotent: `normalize(normalize(x)) == normalize(x)`.
/// When unwrapping a sequence, normalize the *difference* of two samples,
/// never the samples themselves.
pub fn normalize(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    if angle > -PI && angle <= PI {
        return angle;
    }

    // `%` keeps the sign of the dividend, so the remainder is in (-2π, 2π).
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Signed shortest angular difference `to - from`, in (-π, π].
#[inline]
pub fn shortest_difference(from: f64, to: f64) -> f64 {
    normalize(to - from)
}

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize_in_range_is_identity() {
        for &a in &[0.0, 0.1, -0.1, 3.0, -3.0, PI] {
            assert_eq!(normalize(a), a);
        }
    }

    #[test]
    fn test_normalize_boundaries() {
        // -π maps to the closed +π edge.
        assert_abs_diff_eq!(normalize(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize(TAU), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize(-TAU - 0.5), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut x = -20.0;
        while x < 20.0 {
            let once = normalize(x);
            assert!(once > -PI && once <= PI, "{} -> {}", x, once);
            assert_eq!(normalize(once), once);
            x += 0.37;
        }
    }

    #[test]
    fn test_difference_across_boundary_is_small() {
        // A 1 rad step across ±π must not look like a ~2π jump.
        let from = PI - 0.5;
        let to = normalize(from + 1.0);
        assert!(to < 0.0);
        assert_abs_diff_eq!(shortest_difference(from, to), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_difference(to, from), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degree_conversion() {
        assert_abs_diff_eq!(deg_to_rad(180.0), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(rad_to_deg(PI / 2.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rad_to_deg(deg_to_rad(65.0)), 65.0, epsilon = 1e-12);
    }
}
