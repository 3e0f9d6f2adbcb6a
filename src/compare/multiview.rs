// Multi-view comparison grid: the same comparison rendered from the
// dorsal, anterior and ventral viewpoints, sharing one colorbar and one
// running total-error panel.

use crate::analyser::{Analyser, EntityKind};
use crate::compare::{
    compare_vectormaps, Animation, CompareLayout, CompareOptions, OptimalRange,
};
use crate::config::StyleConfig;
use crate::error::{Error, Result};
use crate::scene::{DrawOp, Figure, PanelId, RenderSession, ViewPose};

/// Fixed camera poses of the three view rows, top to bottom.
pub const MULTIVIEW_POSES: [ViewPose; 3] = [
    ViewPose {
        elev: 50.0,
        azim: 90.0,
    },
    ViewPose {
        elev: 0.0,
        azim: 90.0,
    },
    ViewPose {
        elev: -50.0,
        azim: 90.0,
    },
];

const ROW_TITLES: [&str; 3] = ["Dorsal\nview", "Anterior\nview", "Ventral\nview"];

#[derive(Debug, Clone, Default)]
pub struct MultiviewOptions {
    pub animation: Option<Animation>,
    pub optimal_ranges: Vec<OptimalRange>,
    /// Replaces the kind-derived column titles.
    pub column_titles: Option<Vec<String>>,
    pub row_titles: Option<Vec<String>>,
}

/// Panel assignment of the multi-view grid. Allocate once per figure and
/// reuse across animation frames; the orchestrator clears what needs
/// clearing at the start of each frame.
#[derive(Debug, Clone)]
pub struct MultiviewLayout {
    /// 3D panels, row-major: `per_view` panels for each of the 3 views.
    grid: Vec<PanelId>,
    per_view: usize,
    pub illustrate: PanelId,
    pub total_error: PanelId,
    pub colorbar: PanelId,
    pub biphasic: bool,
}

impl MultiviewLayout {
    /// Build the grid for the given sweep: 3 rows of three map panels,
    /// four when a tilt sweep adds the reverse-phase difference column,
    /// plus the shared illustration, total-error and colorbar panels.
    pub fn allocate(figure: &mut Figure, animation: Option<&Animation>) -> Self {
        let biphasic = matches!(animation, Some(a) if a.kind.is_tilt());
        let per_view = if biphasic { 4 } else { 3 };
        let grid = (0..3 * per_view).map(|_| figure.add_panel()).collect();
        Self {
            grid,
            per_view,
            illustrate: figure.add_panel(),
            total_error: figure.add_panel(),
            colorbar: figure.add_panel(),
            biphasic,
        }
    }

    pub fn grid(&self) -> &[PanelId] {
        &self.grid
    }

    fn row(&self, view: usize) -> &[PanelId] {
        &self.grid[view * self.per_view..(view + 1) * self.per_view]
    }

    fn view_layout(&self, view: usize) -> CompareLayout {
        let row = self.row(view);
        let first = view == 0;
        CompareLayout {
            vectormap1: row[0],
            vectormap2: row[1],
            biphasic: self.biphasic.then(|| row[2]),
            difference: row[self.per_view - 1],
            illustrate: first.then_some(self.illustrate),
            total_error: first.then_some(self.total_error),
            colorbar: first.then_some(self.colorbar),
        }
    }
}

fn base_column_titles(biphasic: bool) -> Vec<String> {
    let titles: &[&str] = if biphasic {
        &[
            "Microsaccades",
            "Rhabdomere orientation",
            "Difference\n with slower phase",
            "Difference\n with fast phase",
            "",
        ]
    } else {
        &[
            "Microsaccades",
            "Rhabdomere orientation",
            "Difference",
            "Mean microsaccade",
        ]
    };
    titles.iter().map(|t| t.to_string()).collect()
}

/// Column titles adapt to what the compared entities actually are; the
/// lookup is keyed on entity kind only.
fn column_titles(
    opts: &MultiviewOptions,
    biphasic: bool,
    analyser1: &dyn Analyser,
    analyser2: &dyn Analyser,
) -> Vec<String> {
    let mut titles = opts
        .column_titles
        .clone()
        .unwrap_or_else(|| base_column_titles(biphasic));

    let multiline = titles.iter().any(|t| t.contains('\n'));
    for (i, analyser) in [analyser1, analyser2].into_iter().enumerate() {
        let Some(title) = titles.get_mut(i) else { break };
        match analyser.kind().effective() {
            EntityKind::OpticFlowModel => {
                *title = if multiline {
                    "Optic flow\n".to_string()
                } else {
                    "Optic flow".to_string()
                };
            }
            EntityKind::Measured if analyser.receptive_fields() => {
                *title = "Biphasic receptive field\nmovement directions".to_string();
            }
            _ => {}
        }
    }
    if *analyser1.kind().effective() == EntityKind::OpticFlowModel {
        if let Some(last) = titles.last_mut() {
            *last = "Mean optic flow axis".to_string();
        }
    }
    titles
}

/// Render one multi-view comparison frame.
///
/// Runs the comparison once per view pose. Only the first view carries the
/// illustration, total-error and colorbar panels, so the running series
/// accumulates exactly one point per frame. Shared panels and the map grid
/// are cleared first, which makes this safe to call repeatedly on the same
/// figure as an animation-frame callback.
pub fn compare_vectormaps_multiview(
    figure: &mut Figure,
    layout: &MultiviewLayout,
    session: &mut RenderSession,
    analyser1: &mut dyn Analyser,
    analyser2: &mut dyn Analyser,
    style: &StyleConfig,
    opts: &MultiviewOptions,
) -> Result<()> {
    let biphasic = matches!(&opts.animation, Some(a) if a.kind.is_tilt());
    if biphasic && !layout.biphasic {
        return Err(Error::MissingPanel {
            purpose: "reverse-phase difference column",
        });
    }

    // Stale content from the previous frame.
    figure.panel_mut(layout.total_error).clear();
    figure.panel_mut(layout.illustrate).clear();
    for id in &layout.grid {
        figure.panel_mut(*id).clear();
    }

    let titles = column_titles(opts, layout.biphasic, analyser1, analyser2);
    for (column, title) in titles.iter().take(layout.per_view).enumerate() {
        figure.panel_mut(layout.grid[column]).title = title.clone();
    }
    if let Some(last) = titles.last() {
        figure.panel_mut(layout.illustrate).title = last.clone();
    }

    let row_titles = opts
        .row_titles
        .clone()
        .unwrap_or_else(|| ROW_TITLES.iter().map(|t| t.to_string()).collect());
    for (view, title) in row_titles.iter().enumerate().take(3) {
        let (x, text) = if layout.biphasic {
            (-0.1, title.replace('\n', " "))
        } else {
            (-0.375, title.clone())
        };
        figure.panel_mut(layout.row(view)[0]).push(DrawOp::Text {
            x,
            y: 0.5,
            text,
            color: crate::config::BLACK,
        });
    }

    for id in &layout.grid {
        figure.panel_mut(*id).axis_visible = false;
    }

    for (view, pose) in MULTIVIEW_POSES.iter().enumerate() {
        let first = view == 0;
        let view_opts = CompareOptions {
            animation: opts.animation.clone(),
            optimal_ranges: opts.optimal_ranges.clone(),
            illustrate: first,
            total_error: first,
            compact: false,
            biphasic,
            colorbar: first,
            view: Some(*pose),
            vertical_hardborder: true,
        };
        compare_vectormaps(
            figure,
            &layout.view_layout(view),
            session,
            analyser1,
            analyser2,
            style,
            &view_opts,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{AnimationType, AnimationVariable};
    use crate::model::FlowAnalyser;

    fn sweep(kind: AnimationType, variable: f64) -> Animation {
        Animation {
            kind,
            variable: AnimationVariable::Scalar(variable),
            sweep: (-45.0, 45.0),
        }
    }

    fn render(
        figure: &mut Figure,
        layout: &MultiviewLayout,
        session: &mut RenderSession,
        opts: &MultiviewOptions,
    ) {
        let style = StyleConfig::default();
        let mut a = FlowAnalyser::new("a");
        let mut b = FlowAnalyser::new("b");
        compare_vectormaps_multiview(figure, layout, session, &mut a, &mut b, &style, opts)
            .unwrap();
    }

    #[test]
    fn test_grid_dimensions() {
        let mut figure = Figure::new((16.0, 9.0));
        let plain = MultiviewLayout::allocate(&mut figure, None);
        assert_eq!(plain.grid().len(), 9);

        let animation = sweep(AnimationType::PitchRot, 0.0);
        let mut figure = Figure::new((16.0, 9.0));
        let tilted = MultiviewLayout::allocate(&mut figure, Some(&animation));
        assert_eq!(tilted.grid().len(), 12);
        assert!(tilted.biphasic);
    }

    #[test]
    fn test_views_get_fixed_poses() {
        let mut figure = Figure::new((16.0, 9.0));
        let opts = MultiviewOptions {
            animation: Some(sweep(AnimationType::RotateArrows, 10.0)),
            ..MultiviewOptions::default()
        };
        let layout = MultiviewLayout::allocate(&mut figure, opts.animation.as_ref());
        let mut session = RenderSession::new();
        render(&mut figure, &layout, &mut session, &opts);

        for (view, pose) in MULTIVIEW_POSES.iter().enumerate() {
            let first_panel = layout.grid()[view * 3];
            assert_eq!(figure.panel(first_panel).view, Some(*pose));
        }
    }

    #[test]
    fn test_single_accumulation_per_frame() {
        let mut figure = Figure::new((16.0, 9.0));
        let opts = MultiviewOptions {
            animation: Some(sweep(AnimationType::PitchRot, -45.0)),
            ..MultiviewOptions::default()
        };
        let layout = MultiviewLayout::allocate(&mut figure, opts.animation.as_ref());
        let mut session = RenderSession::new();
        render(&mut figure, &layout, &mut session, &opts);
        assert_eq!(session.errors().len(), 1, "three views, one accumulation");
        assert_eq!(session.reverse_means().len(), 1);
    }

    #[test]
    fn test_repeated_frames_share_one_colorbar_and_clear_curves() {
        let mut figure = Figure::new((16.0, 9.0));
        let mut session = RenderSession::new();
        let layout = {
            let animation = sweep(AnimationType::PitchRot, 0.0);
            MultiviewLayout::allocate(&mut figure, Some(&animation))
        };
        for v in [-45.0, 0.0, 45.0] {
            let opts = MultiviewOptions {
                animation: Some(sweep(AnimationType::PitchRot, v)),
                ..MultiviewOptions::default()
            };
            render(&mut figure, &layout, &mut session, &opts);
        }
        assert_eq!(session.errors().len(), 3);

        let colorbars = figure
            .panel(layout.colorbar)
            .count_ops(|op| matches!(op, DrawOp::Colorbar { .. }));
        assert_eq!(colorbars, 1);

        let fast_curves = figure.panel(layout.total_error).count_ops(
            |op| matches!(op, DrawOp::Curve { label, .. } if label == "Fast phase"),
        );
        assert_eq!(fast_curves, 1, "frame redraw must not stack curves");
    }

    #[test]
    fn test_flow_reference_renames_columns() {
        let mut figure = Figure::new((16.0, 9.0));
        let opts = MultiviewOptions {
            animation: Some(sweep(AnimationType::RotateArrows, 0.0)),
            ..MultiviewOptions::default()
        };
        let layout = MultiviewLayout::allocate(&mut figure, opts.animation.as_ref());
        let mut session = RenderSession::new();
        render(&mut figure, &layout, &mut session, &opts);

        assert_eq!(figure.panel(layout.grid()[0]).title, "Optic flow");
        assert_eq!(figure.panel(layout.grid()[1]).title, "Optic flow");
        assert_eq!(figure.panel(layout.illustrate).title, "Mean optic flow axis");
    }

    #[test]
    fn test_biphasic_column_titles() {
        let mut figure = Figure::new((16.0, 9.0));
        let opts = MultiviewOptions {
            animation: Some(sweep(AnimationType::YawRot, 10.0)),
            ..MultiviewOptions::default()
        };
        let layout = MultiviewLayout::allocate(&mut figure, opts.animation.as_ref());
        let mut session = RenderSession::new();
        render(&mut figure, &layout, &mut session, &opts);

        assert_eq!(
            figure.panel(layout.grid()[2]).title,
            "Difference\n with slower phase"
        );
        assert_eq!(
            figure.panel(layout.grid()[3]).title,
            "Difference\n with fast phase"
        );
    }

    #[test]
    fn test_tilt_sweep_needs_biphasic_layout() {
        let mut figure = Figure::new((16.0, 9.0));
        let layout = MultiviewLayout::allocate(&mut figure, None);
        let mut session = RenderSession::new();
        let style = StyleConfig::default();
        let mut a = FlowAnalyser::new("a");
        let mut b = FlowAnalyser::new("b");
        let opts = MultiviewOptions {
            animation: Some(sweep(AnimationType::RollRot, 5.0)),
            ..MultiviewOptions::default()
        };
        let err = compare_vectormaps_multiview(
            &mut figure,
            &layout,
            &mut session,
            &mut a,
            &mut b,
            &style,
            &opts,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingPanel { .. }));
    }
}
