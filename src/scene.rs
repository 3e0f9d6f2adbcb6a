// Rendering target model.
//
// The pipeline never rasterizes anything itself: a Panel records opaque draw
// operations (arrows, surface patches, glyphs, curves, images) that a
// downstream backend consumes. A RenderSession carries the only persistent
// cross-call state of a sweep: the running error series and the
// colorbar-presence marker.

use crate::config::Color;
use crate::geometry::{AzimuthRange, Vec3, VectorField};

/// Camera pose of a 3D panel: elevation and azimuth in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub elev: f64,
    pub azim: f64,
}

impl ViewPose {
    pub fn new(elev: f64, azim: f64) -> Self {
        Self { elev, azim }
    }
}

/// Orientation of the 2D optic-flow sketch drawn over tilt illustrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSketch {
    Side,
    OutOfPlane,
}

/// Styling for an arrow-field draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStyle {
    pub color: Color,
    /// Draw ventral/dorsal/left/right guidance axes.
    pub guidance: bool,
    pub draw_sphere: bool,
    /// Camera pose used to hide arrows on the far side of the sphere.
    pub camera: Option<ViewPose>,
    /// Pulsation frame index for animated arrow length.
    pub pulse_frame: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Arrow field (`vector_plot`).
    Vectors {
        field: VectorField,
        style: ArrowStyle,
    },
    /// Undirected orientation line through a point (`add_line`).
    Line {
        point: Vec3,
        vector: Vec3,
        color: Color,
        camera: Option<ViewPose>,
    },
    /// Rhabdomere mosaic glyph at a sampling point (`add_rhabdomeres`).
    Rhabdomere {
        point: Vec3,
        vector: Vec3,
        mirror_lr: bool,
        camera: Option<ViewPose>,
    },
    /// Interpolated error surface over one azimuth range (`surface_plot`).
    Surface {
        points: Vec<Vec3>,
        values: Vec<f64>,
        azimuth: AzimuthRange,
    },
    /// Colorbar explaining the error surface colors.
    Colorbar { labels: Vec<&'static str> },
    /// Named static image asset, rotated in the image plane.
    Image { asset: String, rotation_deg: f64 },
    /// 2D optic-flow sketch over an illustration (`plot_2d_opticflow`).
    FlowSketch2d { orientation: FlowSketch },
    /// Annotation line through the image center at the given angle.
    AxisLine {
        angle_deg: f64,
        color: Color,
        dashed: bool,
    },
    /// Line plot through the given sample pairs.
    Curve {
        xs: Vec<f64>,
        ys: Vec<f64>,
        color: Color,
        label: String,
    },
    /// Point marker, highlights the newest sweep sample.
    Marker { x: f64, y: f64, color: Color },
    /// Text annotation in panel coordinates.
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
    },
    /// Border highlight with a label, flags an optimal range hit.
    BorderHighlight { label: String, color: Color },
}

/// One drawing target in a figure. 3D panels have a camera pose and
/// unit-cube limits; 2D panels use the x/y limit and tick fields.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub title: String,
    pub view: Option<ViewPose>,
    pub axis_visible: bool,
    pub unit_cube: bool,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub x_ticks: Option<Vec<f64>>,
    pub y_ticks: Option<Vec<f64>>,
    pub x_label: String,
    pub y_label: String,
    ops: Vec<DrawOp>,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            axis_visible: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop all recorded content and per-draw ranges; the title and camera
    /// pose survive a clear.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.x_limits = None;
        self.y_limits = None;
        self.x_ticks = None;
        self.y_ticks = None;
    }

    pub fn count_ops(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelId(usize);

/// A grid-free collection of panels; layout (who sits where) is the
/// orchestrators' business, the figure only owns the targets.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Figure size in inches (width, height).
    pub size: (f64, f64),
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(size: (f64, f64)) -> Self {
        Self {
            size,
            panels: Vec::new(),
        }
    }

    pub fn add_panel(&mut self) -> PanelId {
        self.panels.push(Panel::new());
        PanelId(self.panels.len() - 1)
    }

    pub fn panel(&self, id: PanelId) -> &Panel {
        &self.panels[id.0]
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut Panel {
        &mut self.panels[id.0]
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }
}

/// Per-sweep state attached to a rendering target by the caller.
///
/// Accumulates one `(animation_variable, mean_error)` pair per comparison
/// frame, plus the reverse-phase means in lockstep for biphasic sweeps, and
/// remembers whether a colorbar has been attached. Independent sweeps need
/// independent sessions; reuse a target for a new sweep only after
/// `reset()`.
#[derive(Debug, Clone, Default)]
pub struct RenderSession {
    errors: Vec<(f64, f64)>,
    reverse_means: Vec<f64>,
    colorbar_attached: bool,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.reverse_means.clear();
        self.colorbar_attached = false;
    }

    pub fn record(&mut self, variable: f64, mean_error: f64) {
        self.errors.push((variable, mean_error));
    }

    pub fn record_reverse(&mut self, mean_error: f64) {
        self.reverse_means.push(mean_error);
    }

    /// `(animation_variable, mean_error)` pairs in accumulation order.
    pub fn errors(&self) -> &[(f64, f64)] {
        &self.errors
    }

    pub fn reverse_means(&self) -> &[f64] {
        &self.reverse_means
    }

    pub fn colorbar_attached(&self) -> bool {
        self.colorbar_attached
    }

    /// Claim the colorbar slot. Returns true exactly once per session;
    /// callers skip drawing when the slot is already taken.
    pub fn try_attach_colorbar(&mut self) -> bool {
        if self.colorbar_attached {
            false
        } else {
            self.colorbar_attached = true;
            true
        }
    }
}
