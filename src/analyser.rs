// Analyser seam: the entities whose vector fields get compared.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::geometry::VectorField;

/// One of the two lateral sampling regions of the analysed visual organ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn label(self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }

    /// Left-eye glyphs are drawn mirrored across the sagittal plane.
    pub fn mirrored(self) -> bool {
        matches!(self, Eye::Left)
    }
}

/// Capability tag resolved once at analyser construction. Replaces any
/// dispatch on concrete type names: the comparison pipeline only ever looks
/// at this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Measured microsaccade data.
    Measured,
    /// Receptor-orientation data, drawn as lines and rhabdomere glyphs.
    Orientation,
    /// Simulated optic-flow field.
    OpticFlowModel,
    /// Average over several analysers of one underlying kind.
    Aggregate(&'static EntityKind),
}

impl EntityKind {
    /// The kind that decides drawing behavior: an aggregate behaves as the
    /// kind of its parts.
    pub fn effective(&self) -> &EntityKind {
        match self {
            EntityKind::Aggregate(inner) => inner.effective(),
            other => other,
        }
    }
}

/// Mutable geometric configuration of an analyser. Angles in degrees.
/// `vector_rotation` turns each vector about the radial axis of its own
/// sampling point; the tilts turn the whole head.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformState {
    pub vector_rotation: f64,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
    pub yaw: Option<f64>,
}

/// The transform fields a single plotting call may override. Listing them
/// explicitly means an unknown field is unrepresentable rather than a
/// silently skipped attribute write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformOverrides {
    pub rotation: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
    pub yaw: Option<f64>,
}

impl TransformOverrides {
    pub fn applied_to(&self, mut state: TransformState) -> TransformState {
        if let Some(rotation) = self.rotation {
            state.vector_rotation = rotation;
        }
        if self.pitch.is_some() {
            state.pitch = self.pitch;
        }
        if self.roll.is_some() {
            state.roll = self.roll;
        }
        if self.yaw.is_some() {
            state.yaw = self.yaw;
        }
        state
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Options for a single vector-field extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    pub correct_level: bool,
    pub repeats_separately: bool,
    /// Reject eyes with missing per-point data instead of substituting.
    pub strict: bool,
    /// Restrict sampling to the eye's own side of the vertical midline.
    pub vertical_hardborder: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            correct_level: true,
            repeats_separately: false,
            strict: true,
            vertical_hardborder: true,
        }
    }
}

/// An entity that can produce a 3D vector field per eye under its current
/// transform state. Data loading and coordinate-system definitions live
/// behind this trait.
pub trait Analyser {
    fn kind(&self) -> EntityKind;
    fn name(&self) -> &str;
    fn eyes(&self) -> &[Eye];
    fn transform(&self) -> TransformState;
    fn set_transform(&mut self, state: TransformState);

    /// Extract the field sampled by `eye` under the current transform state.
    /// With `opts.strict`, missing per-point data is a `DataUnavailable`
    /// error, never a silently shorter field.
    fn get_3d_vectors(&self, eye: Eye, opts: &ExtractOptions) -> Result<VectorField>;

    /// Whether the underlying data represents biphasic receptive-field
    /// movement (changes the displayed column label only).
    fn receptive_fields(&self) -> bool {
        false
    }
}

/// Save/restore discipline for analyser transforms. Saves the state at
/// construction, optionally applies overrides, and restores on drop, so a
/// plotting call that returns early through `?` (or unwinds) can never leak
/// a mutated transform to its caller.
pub struct TransformGuard<'a, A: Analyser + ?Sized> {
    analyser: &'a mut A,
    saved: TransformState,
}

impl<'a, A: Analyser + ?Sized> TransformGuard<'a, A> {
    pub fn new(analyser: &'a mut A) -> Self {
        let saved = analyser.transform();
        Self { analyser, saved }
    }

    pub fn with_overrides(analyser: &'a mut A, overrides: &TransformOverrides) -> Self {
        let mut guard = Self::new(analyser);
        let state = overrides.applied_to(guard.saved);
        guard.analyser.set_transform(state);
        guard
    }

    /// The transform state in effect before this guard was created.
    pub fn saved(&self) -> TransformState {
        self.saved
    }
}

impl<A: Analyser + ?Sized> Deref for TransformGuard<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.analyser
    }
}

impl<A: Analyser + ?Sized> DerefMut for TransformGuard<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.analyser
    }
}

impl<A: Analyser + ?Sized> Drop for TransformGuard<'_, A> {
    fn drop(&mut self) {
        self.analyser.set_transform(self.saved);
    }
}
