//! Crate errors.
//!
//! Everything here is detected at the boundary where data crosses from an
//! analyser into the comparison pipeline. A render call aborts on the first
//! of these instead of producing a partially wrong figure.

use thiserror::Error;

use crate::analyser::Eye;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The two compared analysers disagree on which eyes they sample.
    #[error("eye set mismatch: {left:?} vs {right:?}")]
    EyeSetMismatch { left: Vec<Eye>, right: Vec<Eye> },

    /// Strict extraction found missing or insufficient per-point data.
    #[error("no data for {eye:?} eye of analyser {analyser}: {message}")]
    DataUnavailable {
        analyser: String,
        eye: Eye,
        message: String,
    },

    /// Point/vector/error sequence lengths disagree.
    #[error("dimension mismatch in {context}: {expected} points vs {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// An animation mode was given a variable of the wrong shape,
    /// e.g. a camera pair where a sweep angle is required.
    #[error("animation variable has wrong shape for {mode}: expected {expected}")]
    BadAnimationVariable {
        mode: &'static str,
        expected: &'static str,
    },

    /// A layout lacks a panel the requested options need.
    #[error("layout has no panel for {purpose}")]
    MissingPanel { purpose: &'static str },
}
