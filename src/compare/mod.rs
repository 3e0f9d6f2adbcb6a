// Comparative rendering: two analysers side by side with their difference.

mod differencemap;
mod multiview;
mod vectormap;

pub use differencemap::{plot_differencemap, DifferencemapOptions};
pub use multiview::{compare_vectormaps_multiview, MultiviewLayout, MultiviewOptions, MULTIVIEW_POSES};
pub use vectormap::{plot_vectormap, VectormapOptions};

use crate::analyser::{Analyser, EntityKind, TransformGuard, TransformOverrides};
use crate::config::{StyleConfig, BLACK, GRAY};
use crate::error::{Error, Result};
use crate::flow::mean_error;
use crate::illustrate;
use crate::scene::{DrawOp, Figure, Panel, PanelId, RenderSession, ViewPose};

/// Default head pitch of a simulated flow field, degrees. A fly in flight
/// holds its head pitched up relative to the body axis.
const FLOW_DEFAULT_PITCH: f64 = 10.0;

/// Which geometric parameter an animation sweep drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationType {
    /// Radial rotation of the comparand's vectors.
    RotateArrows,
    PitchRot,
    RollRot,
    YawRot,
    /// Camera orbit; no geometric transform at all.
    RotatePlot,
}

impl AnimationType {
    pub fn is_tilt(self) -> bool {
        matches!(
            self,
            AnimationType::PitchRot | AnimationType::RollRot | AnimationType::YawRot
        )
    }
}

/// The sweep parameter of one animation frame: an angle in degrees, or an
/// (elevation, azimuth) camera pair for `RotatePlot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationVariable {
    Scalar(f64),
    Pair(f64, f64),
}

impl AnimationVariable {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            AnimationVariable::Scalar(v) => Some(*v),
            AnimationVariable::Pair(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub kind: AnimationType,
    pub variable: AnimationVariable,
    /// Full sweep domain; fixes the total-error x-range across frames.
    pub sweep: (f64, f64),
}

/// An interval of the sweep variable flagged as optimal. Purely
/// observational: panels get a highlight, computation is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalRange {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

impl OptimalRange {
    pub fn contains(&self, variable: f64) -> bool {
        self.start < variable && variable < self.end
    }
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub animation: Option<Animation>,
    pub optimal_ranges: Vec<OptimalRange>,
    /// Draw the illustrative reference-image panel.
    pub illustrate: bool,
    /// Accumulate and redraw the running total-error curve.
    pub total_error: bool,
    /// Join both vector maps in one panel.
    pub compact: bool,
    /// Add the reverse-phase difference panel (tilt sweeps).
    pub biphasic: bool,
    pub colorbar: bool,
    pub view: Option<ViewPose>,
    pub vertical_hardborder: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            animation: None,
            optimal_ranges: Vec::new(),
            illustrate: true,
            total_error: true,
            compact: false,
            biphasic: false,
            colorbar: true,
            view: None,
            vertical_hardborder: true,
        }
    }
}

/// Panel assignment for one comparison. Allocate against a fresh figure or
/// build one by hand to reuse panels (the multi-view grid does the latter).
#[derive(Debug, Clone, Copy)]
pub struct CompareLayout {
    pub vectormap1: PanelId,
    /// Same panel as `vectormap1` in compact mode.
    pub vectormap2: PanelId,
    pub biphasic: Option<PanelId>,
    pub difference: PanelId,
    pub illustrate: Option<PanelId>,
    pub total_error: Option<PanelId>,
    /// Shared colorbar panel; the difference panel itself if None.
    pub colorbar: Option<PanelId>,
}

impl CompareLayout {
    pub fn allocate(figure: &mut Figure, opts: &CompareOptions) -> Self {
        let vectormap1 = figure.add_panel();
        let vectormap2 = if opts.compact {
            vectormap1
        } else {
            figure.add_panel()
        };
        let biphasic = opts.biphasic.then(|| figure.add_panel());
        let difference = figure.add_panel();
        let illustrate = opts.illustrate.then(|| figure.add_panel());
        let total_error = opts.total_error.then(|| figure.add_panel());
        Self {
            vectormap1,
            vectormap2,
            biphasic,
            difference,
            illustrate,
            total_error,
            colorbar: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompareOutcome {
    /// Combined error field of the primary difference map.
    pub errors: Vec<f64>,
    /// Slow-phase error field, present on biphasic frames.
    pub reverse_errors: Option<Vec<f64>>,
    /// Whether the animation variable fell in an optimal range.
    pub optimal: bool,
}

/// Render one comparison frame: both analysers' vector maps, their
/// difference map, and optionally the reverse-phase difference, an
/// illustration and the running total-error curve.
///
/// The animation variable is injected into the second analyser's transform
/// according to the animation type; both analysers leave the call with the
/// transform state they entered with. The collinear error metric is used
/// for rotation sweeps, the directional one for tilt sweeps.
pub fn compare_vectormaps(
    figure: &mut Figure,
    layout: &CompareLayout,
    session: &mut RenderSession,
    analyser1: &mut dyn Analyser,
    analyser2: &mut dyn Analyser,
    style: &StyleConfig,
    opts: &CompareOptions,
) -> Result<CompareOutcome> {
    let animation = opts.animation.as_ref();

    let mut vm1 = VectormapOptions {
        view: opts.view,
        vertical_hardborder: opts.vertical_hardborder,
        ..VectormapOptions::default()
    };
    let mut vm2 = vm1.clone();
    let mut diff = DifferencemapOptions {
        colorbar: opts.colorbar,
        colorbar_panel: layout.colorbar,
        view: opts.view,
        ..DifferencemapOptions::default()
    };

    let mut overrides2 = TransformOverrides::default();
    if let Some(animation) = animation {
        let scalar = || {
            animation.variable.scalar().ok_or(Error::BadAnimationVariable {
                mode: "geometry sweep",
                expected: "sweep angle in degrees",
            })
        };
        match animation.kind {
            AnimationType::RotateArrows => {
                let v = scalar()?;
                vm2.arrow_rotations = vec![v];
                overrides2.rotation = Some(v);
            }
            AnimationType::PitchRot => {
                overrides2.pitch = Some(scalar()?);
                diff.colinear = false;
            }
            AnimationType::RollRot => {
                overrides2.roll = Some(scalar()?);
                diff.colinear = false;
            }
            AnimationType::YawRot => {
                overrides2.yaw = Some(scalar()?);
                diff.colinear = false;
            }
            AnimationType::RotatePlot => {
                // The vector maps pick the camera up from the animation
                // directly; the difference panel follows the same orbit.
                match animation.variable {
                    AnimationVariable::Pair(elev, azim) => {
                        diff.view = Some(ViewPose::new(elev, azim));
                    }
                    AnimationVariable::Scalar(_) => {
                        return Err(Error::BadAnimationVariable {
                            mode: "rotate_plot",
                            expected: "(elevation, azimuth) pair",
                        })
                    }
                }
            }
        }
    }

    // Simulated flow fields fly at a default pitch unless the sweep itself
    // drives the pitch.
    let pitch_sweep = matches!(animation, Some(a) if a.kind == AnimationType::PitchRot);
    let flow1 = *analyser1.kind().effective() == EntityKind::OpticFlowModel;
    let flow2 = *analyser2.kind().effective() == EntityKind::OpticFlowModel;
    if flow2 && !pitch_sweep && overrides2.pitch.is_none() {
        overrides2.pitch = Some(FLOW_DEFAULT_PITCH);
    }
    vm2.overrides = TransformOverrides {
        rotation: None,
        ..overrides2
    };
    diff.overrides = overrides2;

    let mut guard1 = TransformGuard::new(analyser1);
    if flow1 && !pitch_sweep {
        let mut state = guard1.transform();
        state.pitch = Some(FLOW_DEFAULT_PITCH);
        guard1.set_transform(state);
    }

    plot_vectormap(figure, layout.vectormap1, &mut *guard1, style, animation, &vm1)?;
    plot_vectormap(figure, layout.vectormap2, analyser2, style, animation, &vm2)?;

    let mut reverse = None;
    if opts.biphasic {
        let panel = layout.biphasic.ok_or(Error::MissingPanel {
            purpose: "reverse-phase difference map",
        })?;
        let mut diff_reverse = diff.clone();
        diff_reverse.reverse = true;
        diff_reverse.colorbar = false;
        reverse = Some(plot_differencemap(
            figure,
            panel,
            session,
            &mut *guard1,
            analyser2,
            style,
            &diff_reverse,
        )?);
    }

    let errors = plot_differencemap(
        figure,
        layout.difference,
        session,
        &mut *guard1,
        analyser2,
        style,
        &diff,
    )?;
    drop(guard1);

    let scalar_variable = animation.and_then(|a| a.variable.scalar());

    let mut optimal = false;
    if opts.illustrate {
        if let (Some(panel), Some(animation), Some(variable)) =
            (layout.illustrate, animation, scalar_variable)
        {
            optimal = illustrate::draw_illustration(
                figure.panel_mut(panel),
                animation.kind,
                variable,
                &opts.optimal_ranges,
                flow1,
                style,
            );
        }
    }

    if opts.total_error {
        if let Some(panel) = layout.total_error {
            match (animation, scalar_variable) {
                (Some(animation), Some(variable)) => {
                    session.record(variable, mean_error(&errors));
                    if let Some(reverse) = &reverse {
                        session.record_reverse(mean_error(reverse));
                    }
                    draw_total_error(figure.panel_mut(panel), session, animation, optimal);
                }
                _ => {
                    tracing::debug!("total-error panel skipped: no scalar animation variable");
                }
            }
        }
    }

    Ok(CompareOutcome {
        errors,
        reverse_errors: reverse,
        optimal,
    })
}

/// Compact comparison frame: both vector maps joined in one panel, no
/// illustration and no total-error panel.
pub fn compare_vectormaps_compact(
    figure: &mut Figure,
    layout: &CompareLayout,
    session: &mut RenderSession,
    analyser1: &mut dyn Analyser,
    analyser2: &mut dyn Analyser,
    style: &StyleConfig,
    opts: &CompareOptions,
) -> Result<CompareOutcome> {
    let opts = CompareOptions {
        compact: true,
        illustrate: false,
        total_error: false,
        ..opts.clone()
    };
    compare_vectormaps(figure, layout, session, analyser1, analyser2, style, &opts)
}

/// Redraw the running error-vs-angle curve from the session's full series.
fn draw_total_error(
    panel: &mut Panel,
    session: &RenderSession,
    animation: &Animation,
    optimal: bool,
) {
    let series = session.errors();
    let xs: Vec<f64> = series.iter().map(|(v, _)| *v).collect();
    let ys: Vec<f64> = series.iter().map(|(_, e)| 1.0 - e).collect();

    if let (Some(min), Some(max)) = (
        series
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1)),
        series
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1)),
    ) {
        tracing::debug!(
            "errors so far: min {:.4} at {:.1} degrees, max {:.4} at {:.1} degrees",
            min.1,
            min.0,
            max.1,
            max.0
        );
    }

    panel.clear();
    panel.push(DrawOp::Curve {
        xs: xs.clone(),
        ys: ys.clone(),
        color: BLACK,
        label: "Fast phase".to_string(),
    });
    if let (Some(x), Some(y)) = (xs.last(), ys.last()) {
        panel.push(DrawOp::Marker {
            x: *x,
            y: *y,
            color: BLACK,
        });
    }

    let reverse = session.reverse_means();
    if !reverse.is_empty() {
        let rys: Vec<f64> = reverse.iter().map(|e| 1.0 - e).collect();
        let rxs: Vec<f64> = xs[..rys.len().min(xs.len())].to_vec();
        panel.push(DrawOp::Curve {
            xs: rxs.clone(),
            ys: rys.clone(),
            color: GRAY,
            label: "Slower phase".to_string(),
        });
        if let (Some(x), Some(y)) = (rxs.last(), rys.last()) {
            panel.push(DrawOp::Marker {
                x: *x,
                y: *y,
                color: GRAY,
            });
        }
    }

    panel.x_label = "Degrees".to_string();
    panel.y_label = "Mean error".to_string();

    let (lo, hi) = animation.sweep;
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    panel.x_limits = Some((lo, hi));
    panel.y_limits = Some((0.0, 1.0));
    panel.y_ticks = Some(vec![0.0, 0.5, 1.0]);
    panel.x_ticks = Some(if lo < -100.0 && hi > 100.0 {
        vec![-90.0, 0.0, 90.0]
    } else {
        vec![-45.0, 0.0, 45.0]
    });

    if let Some(variable) = animation.variable.scalar() {
        let value = if optimal {
            format!("{variable:.1}")
        } else {
            format!("{variable:.0}")
        };
        let text = match animation.kind {
            AnimationType::RotateArrows => {
                format!("Rotation from R3-R6 line\n{value} degrees")
            }
            kind if kind.is_tilt() => format!("Head tilt {value} degrees"),
            _ => format!("Animation variable {value}"),
        };
        panel.push(DrawOp::Text {
            x: 0.1,
            y: 1.0,
            text,
            color: BLACK,
        });
    }
}
