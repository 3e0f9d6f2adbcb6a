// Illustration panel: a labeled reference image for the current sweep step.

use crate::compare::{AnimationType, OptimalRange};
use crate::config::{StyleConfig, GOLD, WHITE};
use crate::scene::{DrawOp, FlowSketch, Panel};

/// Receptor mosaic image shown during arrow-rotation sweeps.
pub const ROTATE_ARROWS_ASSET: &str = "dpp.tif";
/// Side-view head image shown during pitch sweeps.
pub const PITCH_ASSET: &str = "from_mikko_annotated.png";
pub const YAW_ASSET: &str = "rotation_yaw.png";
pub const ROLL_ASSET: &str = "rotation_roll.png";

/// Angle of the receptor R3-R6 line in the mosaic image, degrees.
const R3R6_LINE_DEG: f64 = 40.0;

/// Receptor label positions in mosaic image coordinates, R1 through R7.
const RHABDOMERE_LABELS: [(f64, f64); 7] = [
    (74.0, 60.0),
    (68.0, 79.0),
    (58.0, 101.0),
    (80.0, 94.0),
    (96.0, 87.0),
    (100.0, 66.0),
    (85.0, 74.0),
];

/// Image asset backing the illustration for a sweep type, if any.
pub fn asset_for(kind: AnimationType) -> Option<&'static str> {
    match kind {
        AnimationType::RotateArrows => Some(ROTATE_ARROWS_ASSET),
        AnimationType::PitchRot => Some(PITCH_ASSET),
        AnimationType::YawRot => Some(YAW_ASSET),
        AnimationType::RollRot => Some(ROLL_ASSET),
        AnimationType::RotatePlot => None,
    }
}

/// Redraw the illustration panel for one sweep step. `flow_reference` marks
/// a comparison whose reference entity is an optic-flow model; it adds the
/// dashed resting R3-R6 line to the mosaic. Returns whether `variable` fell
/// inside one of the optimal ranges (the panel is then flagged with a
/// border highlight and label; computation elsewhere is unaffected).
pub fn draw_illustration(
    panel: &mut Panel,
    kind: AnimationType,
    variable: f64,
    optimal_ranges: &[OptimalRange],
    flow_reference: bool,
    style: &StyleConfig,
) -> bool {
    panel.clear();
    panel.axis_visible = false;

    let asset = |name: &str| format!("{}/{}", style.asset_dir, name);

    match kind {
        AnimationType::RotateArrows => {
            panel.push(DrawOp::Image {
                asset: asset(ROTATE_ARROWS_ASSET),
                rotation_deg: 0.0,
            });
            // Current arrow rotation, measured from the R3-R6 line.
            panel.push(DrawOp::AxisLine {
                angle_deg: -(R3R6_LINE_DEG + variable),
                color: style.repeat_colors[0],
                dashed: false,
            });
            if flow_reference {
                panel.push(DrawOp::AxisLine {
                    angle_deg: -R3R6_LINE_DEG,
                    color: WHITE,
                    dashed: true,
                });
            }
            for (i, (x, y)) in RHABDOMERE_LABELS.iter().enumerate() {
                panel.push(DrawOp::Text {
                    x: *x,
                    y: *y,
                    text: format!("R{}", i + 1),
                    color: [51, 51, 51],
                });
            }
        }
        AnimationType::PitchRot => {
            panel.push(DrawOp::Image {
                asset: asset(PITCH_ASSET),
                rotation_deg: variable,
            });
            panel.push(DrawOp::FlowSketch2d {
                orientation: FlowSketch::Side,
            });
        }
        AnimationType::YawRot => {
            panel.push(DrawOp::Image {
                asset: asset(YAW_ASSET),
                rotation_deg: variable,
            });
            panel.push(DrawOp::FlowSketch2d {
                orientation: FlowSketch::Side,
            });
        }
        AnimationType::RollRot => {
            panel.push(DrawOp::Image {
                asset: asset(ROLL_ASSET),
                rotation_deg: variable,
            });
            panel.push(DrawOp::FlowSketch2d {
                orientation: FlowSketch::OutOfPlane,
            });
        }
        AnimationType::RotatePlot => {}
    }

    let mut optimal = false;
    for range in optimal_ranges {
        if range.contains(variable) {
            panel.push(DrawOp::BorderHighlight {
                label: range.label.clone(),
                color: GOLD,
            });
            optimal = true;
        }
    }
    optimal
}
