// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Split breaks a block of attributed text into one unit per glyph.
//!
//! Each glyph carries a fully resolved formatting snapshot ([`Attributes`]), a
//! center point, and a font size. The pipeline has four parts:
//!
//! - [`markup`] turns plain text or a small markup document (`<b>`, `<i>`, `<u>`,
//!   `<s>` toggles plus style elements carrying `font` and `foreground`) into an
//!   ordered list of [`GlyphUnit`]s.
//! - [`position`] produces the center points, either one fixed point or points
//!   spaced evenly by arc length along the first stroke of a path.
//! - [`size`] produces font sizes along one of the [`SizeCurve`]s, clamped to
//!   the configured limits.
//! - [`split`] drives all of the above against a host which owns the actual
//!   canvas units and containers.
//!
//! # Example
//!
//! ```
//! use glyph_split::{InterpolationParams, SizeCurve, size_sequence};
//!
//! let params = InterpolationParams::new(10.0, 30.0, 5.0, 50.0).unwrap();
//! let sizes = size_sequence(SizeCurve::Linear, &params, 3).unwrap();
//! assert_eq!(sizes, [10.0, 20.0, 30.0]);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod attributes;
pub mod markup;
pub mod position;
pub mod size;
pub mod split;

pub use peniko;
pub use peniko::color;
pub use peniko::kurbo;

pub use attributes::{Attributes, StyleScope, Toggle};
pub use markup::{GlyphUnit, Markup, TextSource};
pub use position::{sample_even, MeasuredStroke, Positions, StrokePath};
pub use size::{size_sequence, InterpolationParams, SizeCurve, SizeSequence};
pub use split::{
    split_text, GlyphPlacer, GroupFactory, PlacedGlyph, SplitOptions, SplitRequest, Transaction,
};

use thiserror::Error;

/// Errors that can occur while splitting text.
///
/// Every variant is fatal to the whole operation. Glyphs which the host cannot
/// represent are not errors; they are skipped.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The size limits are narrower than the start or end size, or a value is
    /// not a positive finite number.
    #[error(
        "size limits [{lower}, {upper}] must contain start size {start} and end size {end}, and all must be positive"
    )]
    InvalidRange {
        /// The requested start size.
        start: f32,
        /// The requested end size.
        end: f32,
        /// The requested lower limit.
        lower: f32,
        /// The requested upper limit.
        upper: f32,
    },
    /// No curve goes by this name.
    #[error("no interpolation curve found by name '{0}'")]
    UnknownCurve(String),
    /// Placement on a path was requested, but no path is active.
    #[error("no active path to space glyphs on")]
    NoActivePath,
    /// The active path has no strokes.
    #[error("path has no strokes")]
    EmptyPath,
    /// A bounded sequence was pulled more times than it has values.
    ///
    /// This indicates a bug in the caller.
    #[error("{sequence} sequence exhausted after {len} values")]
    Exhausted {
        /// Which sequence ran out.
        sequence: &'static str,
        /// The number of values the sequence held.
        len: usize,
    },
    /// The markup document is not well formed.
    #[error("couldn't parse markup")]
    Markup(#[from] roxmltree::Error),
    /// A `foreground` attribute did not hold a color.
    #[error("couldn't parse color '{0}'")]
    InvalidColor(String),
}

/// Result type with [`Error`] as the default error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
