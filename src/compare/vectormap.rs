// Single-analyser vector map.

use crate::analyser::{
    Analyser, EntityKind, ExtractOptions, Eye, TransformGuard, TransformOverrides,
};
use crate::compare::{Animation, AnimationType, AnimationVariable};
use crate::config::{Color, StyleConfig};
use crate::error::{Error, Result};
use crate::geometry::VectorField;
use crate::scene::{ArrowStyle, DrawOp, Figure, PanelId, ViewPose};

#[derive(Debug, Clone)]
pub struct VectormapOptions {
    /// Radial rotations of the vectors, one drawing pass each.
    pub arrow_rotations: Vec<f64>,
    /// Tilt overrides applied for the duration of this call.
    pub overrides: TransformOverrides,
    pub view: Option<ViewPose>,
    /// Overrides the kind-based color selection.
    pub color: Option<Color>,
    pub repeats_separately: bool,
    pub vertical_hardborder: bool,
    /// Pulsation frame index for animated arrow length.
    pub pulse_frame: usize,
    /// Draw rhabdomere glyphs under orientation maps.
    pub rhabdomeres: bool,
    pub guidance: bool,
    pub draw_sphere: bool,
    /// Hide arrows on the far side of the sphere from the camera.
    pub hide_behind: bool,
}

impl Default for VectormapOptions {
    fn default() -> Self {
        Self {
            arrow_rotations: vec![0.0],
            overrides: TransformOverrides::default(),
            view: None,
            color: None,
            repeats_separately: false,
            vertical_hardborder: true,
            pulse_frame: 0,
            rhabdomeres: true,
            guidance: false,
            draw_sphere: false,
            hide_behind: true,
        }
    }
}

/// Draw one analyser's vector field into `panel`: arrows pointing the
/// movement or feature directions at each sampling point, color-coded per
/// eye (measured data) or per rotation (orientation data). The analyser's
/// transform state is restored before returning. Returns the per-eye fields
/// of the last rotation pass.
pub fn plot_vectormap(
    figure: &mut Figure,
    panel: PanelId,
    analyser: &mut dyn Analyser,
    style: &StyleConfig,
    animation: Option<&Animation>,
    opts: &VectormapOptions,
) -> Result<Vec<(Eye, VectorField)>> {
    let kind = *analyser.kind().effective();

    let mut rotations = opts.arrow_rotations.clone();
    let mut pulse_frame = opts.pulse_frame;
    match kind {
        EntityKind::Orientation => {
            pulse_frame = 0;
            // The analysed receptor line is R3-R6; the companion line to R1
            // sits 29 degrees away, drawn alongside the resting orientation.
            if rotations == [0.0] {
                rotations.push(29.0);
            }
        }
        EntityKind::OpticFlowModel => {
            let rotating_arrows = matches!(
                animation,
                Some(Animation {
                    kind: AnimationType::RotateArrows,
                    ..
                })
            );
            if !rotating_arrows {
                pulse_frame = 0;
            }
        }
        _ => {}
    }

    let view = match animation {
        Some(Animation {
            kind: AnimationType::RotatePlot,
            variable,
            ..
        }) => match variable {
            AnimationVariable::Pair(elev, azim) => ViewPose::new(*elev, *azim),
            AnimationVariable::Scalar(_) => {
                return Err(Error::BadAnimationVariable {
                    mode: "rotate_plot",
                    expected: "(elevation, azimuth) pair",
                })
            }
        },
        _ => opts
            .view
            .unwrap_or(ViewPose::new(style.default_elev, style.default_azim)),
    };
    let camera = opts.hide_behind.then_some(view);

    let extract = ExtractOptions {
        repeats_separately: opts.repeats_separately,
        vertical_hardborder: opts.vertical_hardborder,
        ..ExtractOptions::default()
    };

    let mut guard = TransformGuard::with_overrides(analyser, &opts.overrides);

    // Orientation maps draw the rhabdomere mosaic first, at rest rotation.
    if kind == EntityKind::Orientation && opts.rhabdomeres {
        let mut state = guard.transform();
        state.vector_rotation = 0.0;
        guard.set_transform(state);
        for i in 0..guard.eyes().len() {
            let eye = guard.eyes()[i];
            let field = guard.get_3d_vectors(eye, &extract)?;
            for (point, vector) in field.iter() {
                figure.panel_mut(panel).push(DrawOp::Rhabdomere {
                    point: *point,
                    vector: *vector,
                    mirror_lr: eye.mirrored(),
                    camera,
                });
            }
        }
    }

    let mut eye_fields: Vec<(Eye, VectorField)> = Vec::new();
    for (i_rotation, rotation) in rotations.iter().enumerate() {
        let mut state = guard.transform();
        state.vector_rotation = *rotation;
        guard.set_transform(state);

        for i in 0..guard.eyes().len() {
            let eye = guard.eyes()[i];
            let color = opts.color.unwrap_or_else(|| match kind {
                EntityKind::Orientation => {
                    style.repeat_colors[i_rotation % style.repeat_colors.len()]
                }
                EntityKind::OpticFlowModel => style.flow_color,
                _ => match eye {
                    Eye::Left => style.eye_colors.left,
                    Eye::Right => style.eye_colors.right,
                },
            });

            let field = guard.get_3d_vectors(eye, &extract)?;

            if kind == EntityKind::Orientation && opts.rhabdomeres {
                for (point, vector) in field.iter() {
                    figure.panel_mut(panel).push(DrawOp::Line {
                        point: *point,
                        vector: *vector,
                        color,
                        camera,
                    });
                }
            } else {
                figure.panel_mut(panel).push(DrawOp::Vectors {
                    field: field.clone(),
                    style: ArrowStyle {
                        color,
                        guidance: opts.guidance,
                        draw_sphere: opts.draw_sphere,
                        camera,
                        pulse_frame,
                    },
                });
            }

            eye_fields.retain(|(e, _)| *e != eye);
            eye_fields.push((eye, field));
        }
    }
    drop(guard);

    let target = figure.panel_mut(panel);
    target.view = Some(view);
    target.unit_cube = true;

    Ok(eye_fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlowAnalyser;
    use crate::scene::Figure;

    fn setup() -> (Figure, PanelId, StyleConfig) {
        let style = StyleConfig::default();
        let mut figure = Figure::new(style.figure_size);
        let panel = figure.add_panel();
        (figure, panel, style)
    }

    #[test]
    fn test_flow_map_uses_flow_color() {
        let (mut figure, panel, style) = setup();
        let mut analyser = FlowAnalyser::new("flow");
        let fields = plot_vectormap(
            &mut figure,
            panel,
            &mut analyser,
            &style,
            None,
            &VectormapOptions::default(),
        )
        .unwrap();
        assert_eq!(fields.len(), 2);
        let arrows = figure
            .panel(panel)
            .count_ops(|op| matches!(op, DrawOp::Vectors { style, .. } if style.color == [148, 0, 211]));
        assert_eq!(arrows, 2, "one arrow field per eye");
    }

    #[test]
    fn test_transform_restored_after_call() {
        let (mut figure, panel, style) = setup();
        let mut analyser = FlowAnalyser::new("flow");
        let mut state = analyser.transform();
        state.vector_rotation = 10.0;
        analyser.set_transform(state);

        let opts = VectormapOptions {
            arrow_rotations: vec![29.0],
            ..VectormapOptions::default()
        };
        plot_vectormap(&mut figure, panel, &mut analyser, &style, None, &opts).unwrap();
        assert_eq!(analyser.transform().vector_rotation, 10.0);
        assert_eq!(analyser.transform().pitch, None);
    }

    #[test]
    fn test_rotate_plot_sets_camera_from_variable() {
        let (mut figure, panel, style) = setup();
        let mut analyser = FlowAnalyser::new("flow");
        let animation = Animation {
            kind: AnimationType::RotatePlot,
            variable: AnimationVariable::Pair(30.0, 120.0),
            sweep: (0.0, 360.0),
        };
        plot_vectormap(
            &mut figure,
            panel,
            &mut analyser,
            &style,
            Some(&animation),
            &VectormapOptions::default(),
        )
        .unwrap();
        assert_eq!(figure.panel(panel).view, Some(ViewPose::new(30.0, 120.0)));
    }

    #[test]
    fn test_rotate_plot_rejects_scalar_variable() {
        let (mut figure, panel, style) = setup();
        let mut analyser = FlowAnalyser::new("flow");
        let animation = Animation {
            kind: AnimationType::RotatePlot,
            variable: AnimationVariable::Scalar(30.0),
            sweep: (0.0, 360.0),
        };
        let err = plot_vectormap(
            &mut figure,
            panel,
            &mut analyser,
            &style,
            Some(&animation),
            &VectormapOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::BadAnimationVariable { .. }));
    }

    struct OrientationStub {
        transform: crate::analyser::TransformState,
        eyes: [Eye; 2],
    }

    impl OrientationStub {
        fn new() -> Self {
            Self {
                transform: crate::analyser::TransformState::default(),
                eyes: [Eye::Left, Eye::Right],
            }
        }
    }

    impl Analyser for OrientationStub {
        fn kind(&self) -> EntityKind {
            EntityKind::Orientation
        }

        fn name(&self) -> &str {
            "orientation"
        }

        fn eyes(&self) -> &[Eye] {
            &self.eyes
        }

        fn transform(&self) -> crate::analyser::TransformState {
            self.transform
        }

        fn set_transform(&mut self, state: crate::analyser::TransformState) {
            self.transform = state;
        }

        fn get_3d_vectors(&self, eye: Eye, _opts: &ExtractOptions) -> Result<VectorField> {
            let azimuth = match eye {
                Eye::Left => std::f64::consts::PI,
                Eye::Right => 0.0,
            };
            let point = crate::geometry::sphere_point(azimuth, 0.0);
            let vector = crate::geometry::rotate_about_radial(
                &point,
                &crate::geometry::Vec3::z(),
                self.transform.vector_rotation,
            );
            VectorField::new(vec![point], vec![vector])
        }
    }

    #[test]
    fn test_orientation_map_draws_lines_and_glyphs() {
        let (mut figure, panel, style) = setup();
        let mut analyser = OrientationStub::new();
        plot_vectormap(
            &mut figure,
            panel,
            &mut analyser,
            &style,
            None,
            &VectormapOptions::default(),
        )
        .unwrap();

        let target = figure.panel(panel);
        // One glyph per point per eye, left eye mirrored.
        assert_eq!(
            target.count_ops(|op| matches!(op, DrawOp::Rhabdomere { .. })),
            2
        );
        assert_eq!(
            target.count_ops(|op| matches!(op, DrawOp::Rhabdomere { mirror_lr: true, .. })),
            1
        );
        // Resting rotation plus the 29 degree companion, lines not arrows.
        assert_eq!(target.count_ops(|op| matches!(op, DrawOp::Vectors { .. })), 0);
        let resting = target
            .count_ops(|op| matches!(op, DrawOp::Line { color, .. } if *color == style.repeat_colors[0]));
        let companion = target
            .count_ops(|op| matches!(op, DrawOp::Line { color, .. } if *color == style.repeat_colors[1]));
        assert_eq!(resting, 2);
        assert_eq!(companion, 2);
    }

    #[test]
    fn test_default_view_from_style() {
        let (mut figure, panel, style) = setup();
        let mut analyser = FlowAnalyser::new("flow");
        plot_vectormap(
            &mut figure,
            panel,
            &mut analyser,
            &style,
            None,
            &VectormapOptions::default(),
        )
        .unwrap();
        assert_eq!(figure.panel(panel).view, Some(ViewPose::new(10.0, 70.0)));
        assert!(figure.panel(panel).unit_cube);
    }
}
