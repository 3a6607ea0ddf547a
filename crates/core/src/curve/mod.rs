use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{Result, TrackError};

/// Uniform cubic B-spline basis, stored column-major so that `BASIS * T(t)`
/// yields the blending weights of the four window points.
#[rustfmt::skip]
const BASIS: Mat4 = Mat4::from_cols_array(&[
    -1.0 / 6.0, 3.0 / 6.0, -3.0 / 6.0, 1.0 / 6.0,
    3.0 / 6.0, -6.0 / 6.0, 3.0 / 6.0, 0.0,
    -3.0 / 6.0, 0.0, 3.0 / 6.0, 0.0,
    1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0,
]);

/// Minimum number of control points for one cubic window.
const WINDOW: usize = 4;

/// Blending weights `M · [t³, t², t, 1]` for the four points of a window.
pub fn basis_weights(t: f32) -> Vec4 {
    BASIS * Vec4::new(t * t * t, t * t, t, 1.0)
}

/// Samples a uniform cubic B-spline over every window of four consecutive
/// control points, `points_per_segment + 1` samples per window with `t`
/// running from 0 to 1 inclusive.
///
/// Fewer than four control points is not an error: the result is empty and
/// means "no curve yet". The windows do not wrap; callers that want a closed
/// track treat the output as cyclic.
pub fn evaluate(control_points: &[Vec3], points_per_segment: u32) -> Result<Vec<Vec3>> {
    if points_per_segment == 0 {
        return Err(TrackError::invalid("points_per_segment must be at least 1"));
    }
    if control_points.len() < WINDOW {
        return Ok(Vec::new());
    }

    let samples = points_per_segment as usize + 1;
    let mut points = Vec::with_capacity((control_points.len() - 3) * samples);
    for window in control_points.windows(WINDOW) {
        for step in 0..=points_per_segment {
            let t = step as f32 / points_per_segment as f32;
            let w = basis_weights(t);
            points.push(window[0] * w.x + window[1] * w.y + window[2] * w.z + window[3] * w.w);
        }
    }
    Ok(points)
}

/// An evaluated curve together with the inputs it was derived from.
///
/// Never edited in place; a new control polygon produces a new curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BSplineCurve {
    control_points: Vec<Vec3>,
    points_per_segment: u32,
    points: Vec<Vec3>,
}

impl BSplineCurve {
    pub fn new(control_points: Vec<Vec3>, points_per_segment: u32) -> Result<Self> {
        let points = evaluate(&control_points, points_per_segment)?;
        tracing::debug!(
            control_points = control_points.len(),
            samples = points.len(),
            "evaluated b-spline"
        );
        Ok(Self {
            control_points,
            points_per_segment,
            points,
        })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    pub fn points_per_segment(&self) -> u32 {
        self.points_per_segment
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hairpin() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn weights_partition_unity() {
        for step in 0..=10 {
            let w = basis_weights(step as f32 / 10.0);
            assert_abs_diff_eq!(w.x + w.y + w.z + w.w, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn weights_at_endpoints() {
        let start = basis_weights(0.0);
        assert_abs_diff_eq!(start.x, 1.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(start.y, 4.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(start.z, 1.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(start.w, 0.0, epsilon = 1e-6);

        let end = basis_weights(1.0);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(end.y, 1.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(end.z, 4.0 / 6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(end.w, 1.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn hairpin_produces_expected_samples() {
        let control = hairpin();
        let points = evaluate(&control, 4).unwrap();

        assert_eq!(points.len(), (6 - 3) * 5);
        assert!(points.iter().all(|p| p.is_finite()));

        let expected = control[0] / 6.0 + control[1] * (4.0 / 6.0) + control[2] / 6.0;
        assert_abs_diff_eq!(points[0].x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(points[0].y, expected.y, epsilon = 1e-6);
        assert_abs_diff_eq!(points[0].z, expected.z, epsilon = 1e-6);
    }

    #[test]
    fn consecutive_windows_join() {
        let points = evaluate(&hairpin(), 8).unwrap();
        // end of window 0 coincides with the start of window 1
        let end_first = points[8];
        let start_second = points[9];
        assert_abs_diff_eq!(end_first.x, start_second.x, epsilon = 1e-5);
        assert_abs_diff_eq!(end_first.y, start_second.y, epsilon = 1e-5);
    }

    #[test]
    fn sample_count_follows_density() {
        let control = hairpin();
        for density in [1, 3, 50] {
            let points = evaluate(&control, density).unwrap();
            assert_eq!(points.len(), 3 * (density as usize + 1));
        }
    }

    #[test]
    fn heights_are_interpolated() {
        let control: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as f32, 0.0, 3.0)).collect();
        let points = evaluate(&control, 5).unwrap();
        for p in points {
            assert_abs_diff_eq!(p.z, 3.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let a = evaluate(&hairpin(), 7).unwrap();
        let b = evaluate(&hairpin(), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_few_points_is_no_curve() {
        let full = hairpin();
        let control = &full[..3];
        assert!(evaluate(control, 10).unwrap().is_empty());
        assert!(BSplineCurve::new(control.to_vec(), 10).unwrap().is_empty());
    }

    #[test]
    fn zero_density_is_rejected() {
        let err = evaluate(&hairpin(), 0).unwrap_err();
        assert!(matches!(err, TrackError::InvalidArgument(_)));
    }
}
