// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Center points for the split glyphs.

use peniko::kurbo::{self, BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point, Rect};

use crate::{Error, Result};

/// Accuracy used for arc length queries.
pub const ARCLEN_ACCURACY: f64 = 1e-5;

/// A path which can be queried by distance along its first stroke.
///
/// A stroke is a connected run of segments, such as one subpath of a
/// [`BezPath`].
pub trait StrokePath {
    /// The number of strokes in the path.
    fn stroke_count(&self) -> usize;

    /// Measure the arc length of every segment of the first stroke.
    fn measure_first_stroke(&self, accuracy: f64) -> MeasuredStroke;

    /// The arc length of the first stroke.
    fn first_stroke_length(&self, accuracy: f64) -> f64 {
        self.measure_first_stroke(accuracy).length()
    }

    /// The point `distance` along the first stroke.
    ///
    /// Distances past either end clamp to that end. This measures the stroke
    /// on every call; measure it once with
    /// [`measure_first_stroke`](Self::measure_first_stroke) to query many
    /// points.
    fn point_at_distance(&self, distance: f64, accuracy: f64) -> Point {
        self.measure_first_stroke(accuracy)
            .point_at(distance, accuracy)
    }
}

impl StrokePath for BezPath {
    fn stroke_count(&self) -> usize {
        self.elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    fn measure_first_stroke(&self, accuracy: f64) -> MeasuredStroke {
        let stroke = first_stroke(self);
        let start = match stroke.first() {
            Some(PathEl::MoveTo(p)) => *p,
            _ => Point::ZERO,
        };
        MeasuredStroke::new(start, kurbo::segments(stroke.iter().copied()), accuracy)
    }
}

/// The elements of the first subpath.
fn first_stroke(path: &BezPath) -> &[PathEl] {
    let elements = path.elements();
    let end = elements
        .iter()
        .skip(1)
        .position(|el| matches!(el, PathEl::MoveTo(_)))
        .map_or(elements.len(), |i| i + 1);
    &elements[..end]
}

/// A stroke with the arc length of each of its segments.
#[derive(Debug, Clone)]
pub struct MeasuredStroke {
    start: Point,
    segments: Vec<(PathSeg, f64)>,
    length: f64,
}

impl MeasuredStroke {
    /// Measure `segments`, a connected run starting at `start`.
    pub fn new(start: Point, segments: impl IntoIterator<Item = PathSeg>, accuracy: f64) -> Self {
        let segments: Vec<_> = segments
            .into_iter()
            .map(|seg| (seg, seg.arclen(accuracy)))
            .collect();
        let length: f64 = segments.iter().map(|(_, len)| len).sum();
        Self {
            start,
            segments,
            length,
        }
    }

    /// The total arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The start of the first segment.
    pub fn start(&self) -> Point {
        self.start
    }

    /// The end of the last segment, or the start if there are no segments.
    pub fn end(&self) -> Point {
        self.segments
            .last()
            .map_or(self.start, |(seg, _)| seg.end())
    }

    /// The point `distance` along the stroke, clamped to either end.
    pub fn point_at(&self, distance: f64, accuracy: f64) -> Point {
        self.walk(accuracy).advance_to(distance)
    }

    fn walk(&self, accuracy: f64) -> StrokeWalk<'_> {
        StrokeWalk {
            stroke: self,
            index: 0,
            offset: 0.0,
            accuracy,
        }
    }
}

/// Forward-only traversal of a [`MeasuredStroke`].
///
/// Distances passed to [`advance_to`](Self::advance_to) must not decrease.
struct StrokeWalk<'a> {
    stroke: &'a MeasuredStroke,
    /// The segment holding the last point.
    index: usize,
    /// The distance at the start of `segments[index]`.
    offset: f64,
    accuracy: f64,
}

impl StrokeWalk<'_> {
    fn advance_to(&mut self, distance: f64) -> Point {
        let stroke = self.stroke;
        if distance <= 0.0 {
            return stroke.start;
        }
        if distance >= stroke.length {
            return stroke.end();
        }
        while let Some((seg, len)) = stroke.segments.get(self.index) {
            let local = distance - self.offset;
            if local < *len {
                return seg.eval(seg.inv_arclen(local.max(0.0), self.accuracy));
            }
            self.offset += len;
            self.index += 1;
        }
        stroke.end()
    }
}

/// Sample `count` points spaced evenly by arc length along the first stroke of `path`.
///
/// The first point is at the start of the stroke and the last is sampled at the
/// full measured length, so it lands on the end of the stroke without
/// accumulating error from the spacing. A single point is sampled at the end.
///
/// The stroke is measured once and then walked forward, so each segment's arc
/// length is only computed once.
pub fn sample_even<P: StrokePath + ?Sized>(path: Option<&P>, count: usize) -> Result<Vec<Point>> {
    let path = path.ok_or(Error::NoActivePath)?;
    if path.stroke_count() == 0 {
        return Err(Error::EmptyPath);
    }
    let mut points = Vec::with_capacity(count);
    if count == 0 {
        return Ok(points);
    }
    let stroke = path.measure_first_stroke(ARCLEN_ACCURACY);
    let length = stroke.length();
    let spacing = if count > 1 {
        length / (count - 1) as f64
    } else {
        0.0
    };
    let mut walk = stroke.walk(ARCLEN_ACCURACY);
    for step in 0..count - 1 {
        points.push(walk.advance_to(step as f64 * spacing));
    }
    points.push(walk.advance_to(length));
    Ok(points)
}

/// A single-use cursor over center points.
#[derive(Debug, Clone)]
pub struct Positions {
    source: Source,
    next: usize,
}

#[derive(Debug, Clone)]
enum Source {
    Fixed(Point),
    Sampled(Vec<Point>),
}

impl Positions {
    /// Yield `point` on every pull, without end.
    pub fn fixed(point: Point) -> Self {
        Self {
            source: Source::Fixed(point),
            next: 0,
        }
    }

    /// Yield the center of `bounds` on every pull, without end.
    pub fn centered(bounds: Rect) -> Self {
        Self::fixed(bounds.center())
    }

    /// Yield `count` points spaced evenly along the first stroke of `path`.
    ///
    /// See [`sample_even`].
    pub fn on_path<P: StrokePath + ?Sized>(path: Option<&P>, count: usize) -> Result<Self> {
        sample_even(path, count).map(Self::from_points)
    }

    /// Yield each of `points` once, in order.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            source: Source::Sampled(points),
            next: 0,
        }
    }

    /// The number of points left, or `None` if the cursor never runs out.
    pub fn remaining(&self) -> Option<usize> {
        match &self.source {
            Source::Fixed(_) => None,
            Source::Sampled(points) => Some(points.len() - self.next),
        }
    }

    /// Pull the next point.
    pub fn pull(&mut self) -> Result<Point> {
        let point = match &self.source {
            Source::Fixed(point) => *point,
            Source::Sampled(points) => *points.get(self.next).ok_or(Error::Exhausted {
                sequence: "position",
                len: points.len(),
            })?,
        };
        self.next += 1;
        Ok(point)
    }
}
