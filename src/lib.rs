//! Comparative 3D vector-map analysis for insect eye imaging experiments.
//!
//! Converts per-eye measurement vectors (3D directional data sampled on an
//! eye model) into comparative visualizations: single-analyser vector maps,
//! pairwise difference maps, multi-view comparison grids and animated
//! sweeps over a rotation or tilt variable.
//!
//! The pipeline records opaque draw operations on [`scene::Panel`]s rather
//! than rasterizing; a downstream backend turns them into pixels. Analysers
//! plug in through the [`analyser::Analyser`] trait, and per-sweep state
//! (the running error series and the colorbar marker) lives in an explicit
//! [`scene::RenderSession`] owned by the caller.

pub mod analyser;
pub mod compare;
pub mod config;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod illustrate;
pub mod model;
pub mod scene;

pub use analyser::{Analyser, EntityKind, ExtractOptions, Eye, TransformGuard, TransformState};
pub use compare::{
    compare_vectormaps, compare_vectormaps_compact, compare_vectormaps_multiview,
    plot_differencemap, plot_vectormap, Animation, AnimationType, AnimationVariable,
    CompareLayout, CompareOptions, CompareOutcome, DifferencemapOptions, MultiviewLayout,
    MultiviewOptions, OptimalRange, VectormapOptions,
};
pub use config::StyleConfig;
pub use error::{Error, Result};
pub use flow::{field_error, mean_error};
pub use geometry::{Vec3, VectorField};
pub use model::FlowAnalyser;
pub use scene::{DrawOp, Figure, Panel, PanelId, RenderSession, ViewPose};
