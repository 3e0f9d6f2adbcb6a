// Geometric types shared across the comparison pipeline.

use std::f64::consts::PI;

use nalgebra::{Rotation3, Unit, Vector3};

use crate::analyser::Eye;
use crate::error::{Error, Result};

pub type Vec3 = Vector3<f64>;

/// Correspondence-indexed set of 3D sampling points and the direction or
/// movement vector measured at each point. `points[i]` belongs to
/// `vectors[i]`; reordering one without the other corrupts any error field
/// computed against this field, so both sequences are private and the length
/// invariant is enforced at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    points: Vec<Vec3>,
    vectors: Vec<Vec3>,
}

impl VectorField {
    pub fn new(points: Vec<Vec3>, vectors: Vec<Vec3>) -> Result<Self> {
        if points.len() != vectors.len() {
            return Err(Error::DimensionMismatch {
                context: "vector field",
                expected: points.len(),
                got: vectors.len(),
            });
        }
        Ok(Self { points, vectors })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn vectors(&self) -> &[Vec3] {
        &self.vectors
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec3, &Vec3)> {
        self.points.iter().zip(self.vectors.iter())
    }
}

/// One azimuthal sampling range of an eye, `[start, end]` radians with
/// `samples` points, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthRange {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl AzimuthRange {
    pub fn values(&self) -> Vec<f64> {
        linspace(self.start, self.end, self.samples)
    }
}

/// The canonical azimuthal partition of the eye sphere. The left eye covers
/// the mid-range half of azimuth at 50 samples; the right eye the two outer
/// quarter ranges at 25 samples each. Surface interpolation and the model
/// sampler must agree on these exact boundaries for visual parity.
pub fn eye_azimuth_ranges(eye: Eye) -> &'static [AzimuthRange] {
    const LEFT: [AzimuthRange; 1] = [AzimuthRange {
        start: PI / 2.0,
        end: 3.0 * PI / 2.0,
        samples: 50,
    }];
    const RIGHT: [AzimuthRange; 2] = [
        AzimuthRange {
            start: 0.0,
            end: PI / 2.0,
            samples: 25,
        },
        AzimuthRange {
            start: 3.0 * PI / 2.0,
            end: 2.0 * PI,
            samples: 25,
        },
    ];
    match eye {
        Eye::Left => &LEFT,
        Eye::Right => &RIGHT,
    }
}

/// `n` evenly spaced values over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Unit-sphere point at the given azimuth and elevation (radians).
/// Azimuth 0 points along +x, elevation 0 lies in the xy plane.
pub fn sphere_point(azimuth: f64, elevation: f64) -> Vec3 {
    Vec3::new(
        elevation.cos() * azimuth.cos(),
        elevation.cos() * azimuth.sin(),
        elevation.sin(),
    )
}

/// Head-tilt rotation. Pitch turns about the lateral x axis, roll about the
/// anteroposterior y axis, yaw about the vertical z axis; angles in degrees.
pub fn tilt_rotation(pitch_deg: f64, roll_deg: f64, yaw_deg: f64) -> Rotation3<f64> {
    // nalgebra's euler order is (x, y, z), applied as Rz * Ry * Rx.
    Rotation3::from_euler_angles(
        pitch_deg.to_radians(),
        roll_deg.to_radians(),
        yaw_deg.to_radians(),
    )
}

/// Rotate `vector` by `angle_deg` about the radial axis through `point`.
/// A zero point (no radial axis) leaves the vector untouched.
pub fn rotate_about_radial(point: &Vec3, vector: &Vec3, angle_deg: f64) -> Vec3 {
    match Unit::try_new(*point, 1e-12) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle_deg.to_radians()) * vector,
        None => *vector,
    }
}
