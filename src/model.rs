// Simulated optic-flow analyser.
//
// Samples the eye sphere on the canonical azimuth partition and produces the
// rotational flow field for a configurable self-motion axis. Needs no
// measurement data, which makes it the reference entity for comparing
// measured maps against ideal flow.

use crate::analyser::{Analyser, EntityKind, ExtractOptions, Eye, TransformState};
use crate::error::Result;
use crate::flow::flow_vector;
use crate::geometry::{
    eye_azimuth_ranges, rotate_about_radial, sphere_point, tilt_rotation, AzimuthRange, Vec3,
    VectorField,
};

pub struct FlowAnalyser {
    name: String,
    eyes: [Eye; 2],
    transform: TransformState,
    /// Self-rotation axis generating the flow, in head coordinates.
    axis: Vec3,
    /// Sampling latitude of the eye ring, radians.
    elevation: f64,
    /// Keep sampling points fixed under tilt; only the vectors move.
    /// Used by arrow-rotation sweeps so the error field stays on one grid.
    pub constant_points: bool,
}

impl FlowAnalyser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eyes: [Eye::Left, Eye::Right],
            transform: TransformState::default(),
            axis: Vec3::z(),
            elevation: 0.0,
            constant_points: false,
        }
    }

    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    fn sample_azimuths(&self, range: &AzimuthRange, hardborder: bool) -> Vec<f64> {
        if hardborder {
            return range.values();
        }
        // Soft border: stretch the range half a sample step past the
        // vertical midline on both sides, keeping the sample count.
        let step = (range.end - range.start) / (range.samples.max(2) - 1) as f64;
        AzimuthRange {
            start: range.start - step / 2.0,
            end: range.end + step / 2.0,
            samples: range.samples,
        }
        .values()
    }
}

impl Analyser for FlowAnalyser {
    fn kind(&self) -> EntityKind {
        EntityKind::OpticFlowModel
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn eyes(&self) -> &[Eye] {
        &self.eyes
    }

    fn transform(&self) -> TransformState {
        self.transform
    }

    fn set_transform(&mut self, state: TransformState) {
        self.transform = state;
    }

    fn get_3d_vectors(&self, eye: Eye, opts: &ExtractOptions) -> Result<VectorField> {
        let tilt = tilt_rotation(
            self.transform.pitch.unwrap_or(0.0),
            self.transform.roll.unwrap_or(0.0),
            self.transform.yaw.unwrap_or(0.0),
        );

        let mut points = Vec::new();
        let mut vectors = Vec::new();
        for range in eye_azimuth_ranges(eye) {
            for azimuth in self.sample_azimuths(range, opts.vertical_hardborder) {
                let base = sphere_point(azimuth, self.elevation);
                let point = if self.constant_points { base } else { tilt * base };
                let vector = tilt * flow_vector(&self.axis, &base);
                points.push(point);
                vectors.push(rotate_about_radial(
                    &point,
                    &vector,
                    self.transform.vector_rotation,
                ));
            }
        }
        VectorField::new(points, vectors)
    }
}
