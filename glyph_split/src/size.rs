// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font size interpolation.
//!
//! A [`SizeSequence`] yields one size per placed glyph, moving from a start size
//! to an end size along a [`SizeCurve`]. Every value is clamped to the limits in
//! [`InterpolationParams`].

use core::fmt;
use core::str::FromStr;

use crate::{Error, Result};

/// Start and end sizes together with the limits every size is clamped to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InterpolationParams {
    start_size: f32,
    end_size: f32,
    lower_limit: f32,
    upper_limit: f32,
}

impl InterpolationParams {
    /// Create a new set of parameters.
    ///
    /// Fails with [`Error::InvalidRange`] unless all values are positive and
    /// finite and both `start_size` and `end_size` lie within
    /// `[lower_limit, upper_limit]`.
    pub fn new(start_size: f32, end_size: f32, lower_limit: f32, upper_limit: f32) -> Result<Self> {
        let positive = [start_size, end_size, lower_limit, upper_limit]
            .iter()
            .all(|value| value.is_finite() && *value > 0.0);
        let contained = (lower_limit..=upper_limit).contains(&start_size)
            && (lower_limit..=upper_limit).contains(&end_size);
        if !positive || !contained {
            return Err(Error::InvalidRange {
                start: start_size,
                end: end_size,
                lower: lower_limit,
                upper: upper_limit,
            });
        }
        Ok(Self {
            start_size,
            end_size,
            lower_limit,
            upper_limit,
        })
    }

    /// Parameters which hold every size at `size`.
    pub fn constant(size: f32) -> Result<Self> {
        Self::new(size, size, size, size)
    }

    /// The size of the first glyph.
    pub fn start_size(&self) -> f32 {
        self.start_size
    }

    /// The size of the last glyph.
    pub fn end_size(&self) -> f32 {
        self.end_size
    }

    /// The smallest size produced.
    pub fn lower_limit(&self) -> f32 {
        self.lower_limit
    }

    /// The largest size produced.
    pub fn upper_limit(&self) -> f32 {
        self.upper_limit
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(f64::from(self.lower_limit), f64::from(self.upper_limit))
    }
}

/// The shape of the size progression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum SizeCurve {
    /// Every glyph has the start size, except that a pair of glyphs still
    /// gets the start and end sizes.
    Constant,
    /// Sizes are spaced evenly from start to end.
    #[default]
    Linear,
    /// Sizes are spaced evenly in log space, so each step grows by the same factor.
    Exponential,
    /// A parabola peaking at the upper limit, with the same number of steps on
    /// either side of the peak.
    Square,
    /// A parabola dipping to the lower limit, with the same number of steps on
    /// either side of the dip.
    NegativeSquare,
    /// Like [`Square`](Self::Square), but each side of the peak gets a share of
    /// the steps proportional to the square root of its height.
    SquareNormalized,
    /// Like [`NegativeSquare`](Self::NegativeSquare), but each side of the dip
    /// gets a share of the steps proportional to the square root of its depth.
    NegativeSquareNormalized,
}

impl SizeCurve {
    /// Every curve.
    pub const ALL: [Self; 7] = [
        Self::Constant,
        Self::Linear,
        Self::Exponential,
        Self::Square,
        Self::NegativeSquare,
        Self::SquareNormalized,
        Self::NegativeSquareNormalized,
    ];

    /// The identifier of the curve, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Linear => "Linear",
            Self::Exponential => "Exponential",
            Self::Square => "Square",
            Self::NegativeSquare => "NegativeSquare",
            Self::SquareNormalized => "SquareNormalized",
            Self::NegativeSquareNormalized => "NegativeSquareNormalized",
        }
    }

    /// The human readable name of the curve, also accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Linear => "Linear",
            Self::Exponential => "Exponential",
            Self::Square => "Square",
            Self::NegativeSquare => "Negative Square",
            Self::SquareNormalized => "Square Normalized X",
            Self::NegativeSquareNormalized => "Negative Square Normalized X",
        }
    }
}

impl fmt::Display for SizeCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|curve| {
                curve.name().eq_ignore_ascii_case(name) || curve.label().eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| Error::UnknownCurve(s.to_owned()))
    }
}

/// A single-use cursor over the sizes of the placed glyphs.
///
/// Holds exactly `total_steps` values, or one value if `total_steps` is zero or
/// one. Pulling more than that is an error.
#[derive(Debug, Clone)]
pub struct SizeSequence {
    shape: Shape,
    params: InterpolationParams,
    len: usize,
    next: usize,
}

#[derive(Debug, Copy, Clone)]
enum Shape {
    Constant,
    Linear,
    Exponential,
    Square { vertex: f64, rise: f64 },
}

impl SizeSequence {
    /// Create the sequence for `total_steps` glyphs.
    pub fn new(curve: SizeCurve, params: InterpolationParams, total_steps: usize) -> Self {
        let shape = match curve {
            SizeCurve::Constant => Shape::Constant,
            SizeCurve::Linear => Shape::Linear,
            SizeCurve::Exponential => Shape::Exponential,
            SizeCurve::Square => square(&params, params.upper_limit, false),
            SizeCurve::NegativeSquare => square(&params, params.lower_limit, false),
            SizeCurve::SquareNormalized => square(&params, params.upper_limit, true),
            SizeCurve::NegativeSquareNormalized => square(&params, params.lower_limit, true),
        };
        Self {
            shape,
            params,
            len: total_steps.max(1),
            next: 0,
        }
    }

    /// The total number of values in the sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a sequence holds at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The number of values which have not been pulled yet.
    pub fn remaining(&self) -> usize {
        self.len - self.next
    }

    /// Pull the next size.
    ///
    /// Sizes are always positive; a non-positive value is replaced by 1.
    pub fn pull(&mut self) -> Result<f32> {
        if self.next >= self.len {
            return Err(Error::Exhausted {
                sequence: "size",
                len: self.len,
            });
        }
        let size = self.value_at(self.next) as f32;
        self.next += 1;
        Ok(if size <= 0.0 { 1.0 } else { size })
    }

    fn value_at(&self, index: usize) -> f64 {
        let params = &self.params;
        let start = f64::from(params.start_size);
        let end = f64::from(params.end_size);
        let last = self.len - 1;
        if index == 0 {
            return start;
        }
        // Two glyphs always get the start and end sizes, whatever the curve.
        if self.len == 2 {
            return end;
        }
        if matches!(self.shape, Shape::Constant) {
            return start;
        }
        if index == last {
            return end;
        }

        let t = index as f64 / last as f64;
        let value = match self.shape {
            Shape::Constant => start,
            Shape::Linear => start + (end - start) * t,
            Shape::Exponential => {
                let (ln_start, ln_end) = (start.ln(), end.ln());
                (ln_start + (ln_end - ln_start) * t).exp()
            }
            Shape::Square { vertex, rise } => {
                let steps = last as f64;
                let x_start = -steps * rise;
                let x_end = steps * (1.0 - rise);
                let x = x_start + index as f64;
                if x <= 0.0 {
                    parabola(vertex, start, x, x_start)
                } else {
                    parabola(vertex, end, x, x_end)
                }
            }
        };
        params.clamp(value)
    }
}

/// Build a square shape with its vertex at `vertex`.
///
/// With `normalized`, each side of the vertex gets a share of the x axis
/// proportional to the square root of its distance from the vertex.
fn square(params: &InterpolationParams, vertex: f32, normalized: bool) -> Shape {
    let vertex = f64::from(vertex);
    let mut rise = 0.5;
    if normalized {
        let start_x = (f64::from(params.start_size) - vertex).abs().sqrt();
        let end_x = (f64::from(params.end_size) - vertex).abs().sqrt();
        if start_x + end_x > 0.0 {
            rise = start_x / (start_x + end_x);
        }
    }
    Shape::Square { vertex, rise }
}

/// Value at `x` on the half parabola through `(0, vertex)` and `(x_edge, edge)`.
fn parabola(vertex: f64, edge: f64, x: f64, x_edge: f64) -> f64 {
    if x_edge == 0.0 {
        return edge;
    }
    let ratio = x / x_edge;
    vertex + (edge - vertex) * ratio * ratio
}

/// Collect the whole sequence for `total_steps` glyphs.
pub fn size_sequence(
    curve: SizeCurve,
    params: &InterpolationParams,
    total_steps: usize,
) -> Result<Vec<f32>> {
    let mut sequence = SizeSequence::new(curve, *params, total_steps);
    (0..sequence.len()).map(|_| sequence.pull()).collect()
}
