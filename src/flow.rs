// Vector-field error metrics and the rotational optic-flow field.

use nalgebra::Unit;

use crate::error::{Error, Result};
use crate::geometry::Vec3;

const DIRECTION_EPS: f64 = 1e-12;

/// Pointwise error between two vector fields that share point
/// correspondence by index. Returns one scalar in [0, 1] per point,
/// evaluated at the first field's points.
///
/// Collinear mode treats vectors as undirected lines: 0 for parallel or
/// antiparallel pairs, 1 for perpendicular ones. Directional mode keeps the
/// sign: 0 for matching, 0.5 for perpendicular, 1 for opposing directions.
/// A pair where exactly one vector has no direction counts as maximal
/// deviation; two degenerate vectors count as a perfect match.
pub fn field_error(
    points_a: &[Vec3],
    vectors_a: &[Vec3],
    points_b: &[Vec3],
    vectors_b: &[Vec3],
    colinear: bool,
) -> Result<Vec<f64>> {
    let n = points_a.len();
    for (context, len) in [
        ("reference vectors", vectors_a.len()),
        ("comparand points", points_b.len()),
        ("comparand vectors", vectors_b.len()),
    ] {
        if len != n {
            return Err(Error::DimensionMismatch {
                context,
                expected: n,
                got: len,
            });
        }
    }

    let mut errors = Vec::with_capacity(n);
    for (va, vb) in vectors_a.iter().zip(vectors_b.iter()) {
        let ua = Unit::try_new(*va, DIRECTION_EPS);
        let ub = Unit::try_new(*vb, DIRECTION_EPS);
        let e = match (ua, ub) {
            (Some(ua), Some(ub)) => {
                let cos = ua.dot(&ub).clamp(-1.0, 1.0);
                if colinear {
                    1.0 - cos.abs()
                } else {
                    (1.0 - cos) / 2.0
                }
            }
            (None, None) => 0.0,
            _ => 1.0,
        };
        errors.push(e.clamp(0.0, 1.0));
    }
    Ok(errors)
}

/// The slow-phase reading of an error field: `e -> 1 - e`, in place.
pub fn reverse_errors(errors: &mut [f64]) {
    for e in errors {
        *e = 1.0 - *e;
    }
}

pub fn mean_error(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    errors.iter().sum::<f64>() / errors.len() as f64
}

/// Optic-flow direction at `point` for self-rotation about `axis`: the
/// tangential direction `axis x point`, normalized. Zero where the point
/// lies on the rotation axis (no image motion there).
pub fn flow_vector(axis: &Vec3, point: &Vec3) -> Vec3 {
    let v = axis.cross(point);
    match Unit::try_new(v, DIRECTION_EPS) {
        Some(u) => u.into_inner(),
        None => Vec3::zeros(),
    }
}

pub fn flow_vectors(axis: &Vec3, points: &[Vec3]) -> Vec<Vec3> {
    points.iter().map(|p| flow_vector(axis, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::sphere_point;

    fn ring_points(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| sphere_point(i as f64 / n as f64 * std::f64::consts::TAU, 0.3))
            .collect()
    }

    #[test]
    fn test_identical_fields_zero_error_both_modes() {
        let points = ring_points(12);
        let vectors = flow_vectors(&Vec3::z(), &points);
        for colinear in [true, false] {
            let errors = field_error(&points, &vectors, &points, &vectors, colinear).unwrap();
            assert_eq!(errors.len(), 12);
            for e in errors {
                assert!(e.abs() < 1e-12, "self-match should be 0, got {e}");
            }
        }
    }

    #[test]
    fn test_negated_field_collinear_vs_directional() {
        let points = ring_points(10);
        let vectors = flow_vectors(&Vec3::z(), &points);
        let negated: Vec<Vec3> = vectors.iter().map(|v| -v).collect();

        let colinear = field_error(&points, &vectors, &points, &negated, true).unwrap();
        for e in colinear {
            assert!(e.abs() < 1e-12, "antiparallel is still collinear, got {e}");
        }

        let directional = field_error(&points, &vectors, &points, &negated, false).unwrap();
        for e in directional {
            assert!((e - 1.0).abs() < 1e-12, "antiparallel should be 1, got {e}");
        }
    }

    #[test]
    fn test_perpendicular_pair() {
        let points = vec![Vec3::z()];
        let a = vec![Vec3::x()];
        let b = vec![Vec3::y()];
        let colinear = field_error(&points, &a, &points, &b, true).unwrap();
        assert!((colinear[0] - 1.0).abs() < 1e-12);
        let directional = field_error(&points, &a, &points, &b, false).unwrap();
        assert!((directional[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_vectors() {
        let points = vec![Vec3::z(), Vec3::z()];
        let a = vec![Vec3::x(), Vec3::zeros()];
        let b = vec![Vec3::zeros(), Vec3::zeros()];
        let errors = field_error(&points, &a, &points, &b, true).unwrap();
        assert_eq!(errors[0], 1.0, "one missing direction is maximal deviation");
        assert_eq!(errors[1], 0.0, "two missing directions match");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let points = ring_points(4);
        let vectors = flow_vectors(&Vec3::z(), &points);
        let short = vectors[..3].to_vec();
        let err = field_error(&points, &vectors, &points, &short, true).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_reverse_errors_involutive() {
        let mut errors = vec![0.0, 0.25, 0.5, 0.99, 1.0];
        let original = errors.clone();
        reverse_errors(&mut errors);
        assert!((errors[1] - 0.75).abs() < 1e-12);
        reverse_errors(&mut errors);
        for (a, b) in errors.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flow_is_tangential() {
        let axis = Vec3::new(0.3, -0.2, 0.9).normalize();
        for p in ring_points(16) {
            let v = flow_vector(&axis, &p);
            assert!(v.dot(&p).abs() < 1e-10, "flow must be tangent to the sphere");
            assert!(v.dot(&axis).abs() < 1e-10, "flow must be normal to the axis");
        }
    }

    #[test]
    fn test_flow_zero_on_axis() {
        let v = flow_vector(&Vec3::z(), &Vec3::z());
        assert_eq!(v, Vec3::zeros());
    }

    #[test]
    fn test_mean_error() {
        assert_eq!(mean_error(&[]), 0.0);
        assert!((mean_error(&[0.0, 0.5, 1.0]) - 0.5).abs() < 1e-12);
    }
}
