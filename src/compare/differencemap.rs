// Pairwise difference map: how much two vector maps disagree, per point.

use crate::analyser::{Analyser, ExtractOptions, TransformGuard, TransformOverrides};
use crate::config::StyleConfig;
use crate::error::{Error, Result};
use crate::flow::{field_error, reverse_errors};
use crate::geometry::eye_azimuth_ranges;
use crate::scene::{DrawOp, Figure, PanelId, RenderSession, ViewPose};

#[derive(Debug, Clone)]
pub struct DifferencemapOptions {
    /// Treat vectors as undirected lines. Directional error is the
    /// meaningful metric once a 3D tilt breaks the collinear symmetry.
    pub colinear: bool,
    /// Report the complementary slow-phase error `1 - e`.
    pub reverse: bool,
    pub colorbar: bool,
    /// Panel carrying the colorbar; the difference panel itself if None.
    pub colorbar_panel: Option<PanelId>,
    /// Rotation and tilt overrides, applied to the second analyser only
    /// and restored after use.
    pub overrides: TransformOverrides,
    pub view: Option<ViewPose>,
}

impl Default for DifferencemapOptions {
    fn default() -> Self {
        Self {
            colinear: true,
            reverse: false,
            colorbar: true,
            colorbar_panel: None,
            overrides: TransformOverrides::default(),
            view: None,
        }
    }
}

fn colorbar_labels(colinear: bool) -> Vec<&'static str> {
    if colinear {
        vec!["Collinear", "Perpendicular"]
    } else {
        vec!["Matching", "Perpendicular", "Opposing"]
    }
}

/// Render the pointwise difference between two analysers' vector maps as a
/// colored surface over the eye sphere.
///
/// Errors are evaluated at `analyser1`'s points; `opts.overrides` affect
/// `analyser2` only. Both analysers must sample the same eyes; per-eye
/// error fields are concatenated in eye order into the returned combined
/// field. At most one colorbar is attached per session, no matter how often
/// this is called against the same target.
pub fn plot_differencemap(
    figure: &mut Figure,
    panel: PanelId,
    session: &mut RenderSession,
    analyser1: &mut dyn Analyser,
    analyser2: &mut dyn Analyser,
    style: &StyleConfig,
    opts: &DifferencemapOptions,
) -> Result<Vec<f64>> {
    let eyes = analyser1.eyes().to_vec();
    {
        let other = analyser2.eyes();
        if eyes.len() != other.len() || eyes.iter().any(|e| !other.contains(e)) {
            return Err(Error::EyeSetMismatch {
                left: eyes,
                right: other.to_vec(),
            });
        }
    }

    let guard2 = TransformGuard::with_overrides(analyser2, &opts.overrides);
    let extract = ExtractOptions::default();

    let mut combined = Vec::new();
    for eye in eyes {
        let reference = analyser1.get_3d_vectors(eye, &extract)?;
        let comparand = guard2.get_3d_vectors(eye, &extract)?;

        let mut errors = field_error(
            reference.points(),
            reference.vectors(),
            comparand.points(),
            comparand.vectors(),
            opts.colinear,
        )?;
        if opts.reverse {
            reverse_errors(&mut errors);
        }

        for range in eye_azimuth_ranges(eye) {
            figure.panel_mut(panel).push(DrawOp::Surface {
                points: reference.points().to_vec(),
                values: errors.clone(),
                azimuth: *range,
            });
        }
        combined.extend_from_slice(&errors);
    }
    drop(guard2);

    if opts.colorbar && session.try_attach_colorbar() {
        let target = opts.colorbar_panel.unwrap_or(panel);
        figure.panel_mut(target).push(DrawOp::Colorbar {
            labels: colorbar_labels(opts.colinear),
        });
    }

    let target = figure.panel_mut(panel);
    target.view = Some(
        opts.view
            .unwrap_or(ViewPose::new(style.default_elev, style.default_azim)),
    );
    target.unit_cube = true;

    Ok(combined)
}
