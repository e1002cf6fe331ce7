// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting text into one placed unit per glyph.
//!
//! [`split_text`] is the entry point. It owns the position and size cursors for
//! the duration of one run and talks to the host through three traits:
//!
//! - [`Transaction`] brackets the whole run, so the host can group its changes
//!   (for example, into a single undo step).
//! - [`GroupFactory`] creates the container which receives the units.
//! - [`GlyphPlacer`] creates a unit per glyph and finally sizes and positions it.

use core::ops::{Deref, DerefMut};

use log::{debug, trace};
use peniko::kurbo::{BezPath, Point, Rect};

use crate::attributes::{Attributes, StyleScope};
use crate::markup::{GlyphUnit, TextSource};
use crate::position::Positions;
use crate::size::{InterpolationParams, SizeCurve, SizeSequence};
use crate::Result;

/// A begin/end bracket around a whole split.
///
/// `end` is called on every exit path once `begin` has been called, including
/// when the split fails part way. Changes already made are not undone by this
/// crate; whether they are rolled back is up to the host.
pub trait Transaction {
    /// Start grouping changes.
    fn begin(&mut self);
    /// Stop grouping changes.
    fn end(&mut self);
}

/// Creates the container which receives the split units.
pub trait GroupFactory {
    /// The container type.
    type Group;

    /// Create a container called `name` at `stack_position` in the host's stack.
    fn new_group(&mut self, name: &str, stack_position: usize) -> Self::Group;
}

/// Creates and adjusts the unit for each glyph.
pub trait GlyphPlacer: GroupFactory {
    /// A placed glyph in the host, such as a text layer.
    type Unit;

    /// Create a unit for `glyph` inside `group`.
    ///
    /// `index` is the position of the glyph in the source text, counting glyphs
    /// which were skipped. Returns `None` if the glyph can't be represented;
    /// the glyph is then skipped. This must not panic on whitespace or control
    /// characters.
    fn place(
        &mut self,
        glyph: char,
        attributes: &Attributes,
        group: &mut Self::Group,
        index: usize,
    ) -> Option<Self::Unit>;

    /// Set the final size of `unit` and center it on `center`.
    fn apply(&mut self, unit: &mut Self::Unit, size: f32, center: Point);
}

/// Calls [`Transaction::end`] when dropped.
struct TransactionGuard<'a, T: Transaction + ?Sized> {
    host: &'a mut T,
}

impl<'a, T: Transaction + ?Sized> TransactionGuard<'a, T> {
    fn begin(host: &'a mut T) -> Self {
        host.begin();
        Self { host }
    }
}

impl<T: Transaction + ?Sized> Deref for TransactionGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.host
    }
}

impl<T: Transaction + ?Sized> DerefMut for TransactionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.host
    }
}

impl<T: Transaction + ?Sized> Drop for TransactionGuard<'_, T> {
    fn drop(&mut self) {
        self.host.end();
    }
}

/// How sizes and positions are chosen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SplitOptions {
    /// The size progression.
    pub curve: SizeCurve,
    /// The size of the first placed glyph.
    pub start_size: f32,
    /// The size of the last placed glyph.
    pub end_size: f32,
    /// The smallest size produced.
    pub lower_limit: f32,
    /// The largest size produced.
    pub upper_limit: f32,
    /// Space the glyphs along the active path instead of stacking them on the
    /// center of the source.
    pub space_on_path: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            curve: SizeCurve::Linear,
            start_size: 30.0,
            end_size: 30.0,
            lower_limit: 5.0,
            upper_limit: 50.0,
            space_on_path: false,
        }
    }
}

impl SplitOptions {
    /// Every glyph gets `size`.
    pub fn constant(size: f32) -> Self {
        Self {
            curve: SizeCurve::Constant,
            start_size: size,
            end_size: size,
            lower_limit: size,
            upper_limit: size,
            space_on_path: false,
        }
    }

    /// Validate the sizes.
    pub fn params(&self) -> Result<InterpolationParams> {
        InterpolationParams::new(
            self.start_size,
            self.end_size,
            self.lower_limit,
            self.upper_limit,
        )
    }
}

/// The text being split and where it lives in the host.
#[derive(Debug, Clone)]
pub struct SplitRequest<'a> {
    /// The text to split.
    pub source: TextSource,
    /// The name of the source, used to name the group.
    pub name: &'a str,
    /// The position of the source in the host's stack.
    ///
    /// The group is created just after it.
    pub stack_position: usize,
    /// The bounds of the source. Glyphs are centered here when not spaced on a path.
    pub bounds: Rect,
    /// Formatting for text which doesn't specify its own.
    pub defaults: Attributes,
    /// Whether style elements in markup affect text after them.
    pub style_scope: StyleScope,
    /// The active path, if any.
    pub path: Option<&'a BezPath>,
}

impl<'a> SplitRequest<'a> {
    /// A request with default attributes and no path.
    pub fn new(source: TextSource, name: &'a str, bounds: Rect) -> Self {
        Self {
            source,
            name,
            stack_position: 0,
            bounds,
            defaults: Attributes::default(),
            style_scope: StyleScope::default(),
            path: None,
        }
    }

    /// The name of the group created for this source.
    pub fn group_name(&self) -> String {
        format!("Split '{}'", self.name)
    }
}

/// A glyph which made it into the host.
#[derive(Debug, Clone)]
pub struct PlacedGlyph<U> {
    /// The position of the glyph in the source text, counting skipped glyphs.
    pub index: usize,
    /// The glyph.
    pub glyph: char,
    /// Its formatting.
    pub attributes: Attributes,
    /// Where it was centered.
    pub center: Point,
    /// Its final size.
    pub size: f32,
    /// The host's unit.
    pub unit: U,
}

/// Whether a glyph is worth asking the host to place.
fn is_placeable(glyph: char) -> bool {
    !glyph.is_whitespace() && !glyph.is_control()
}

/// Split `request` into one unit per placeable glyph.
///
/// Every glyph in the source takes a position, so skipped glyphs leave a gap
/// when spaced on a path. Sizes are only taken by placed glyphs, so the size
/// curve runs from the first placed glyph to the last.
pub fn split_text<H>(
    host: &mut H,
    request: &SplitRequest<'_>,
    options: &SplitOptions,
) -> Result<Vec<PlacedGlyph<H::Unit>>>
where
    H: GlyphPlacer + Transaction + ?Sized,
{
    let mut host = TransactionGuard::begin(host);

    let params = options.params()?;
    let glyphs = request
        .source
        .glyphs(&request.defaults, request.style_scope)?;
    let mut positions = if options.space_on_path {
        Positions::on_path(request.path, glyphs.len())?
    } else {
        Positions::centered(request.bounds)
    };
    let mut group = host.new_group(&request.group_name(), request.stack_position + 1);

    let mut retained = Vec::new();
    for (index, GlyphUnit { glyph, attributes }) in glyphs.into_iter().enumerate() {
        let center = positions.pull()?;
        if !is_placeable(glyph) {
            trace!("Skipping unplaceable glyph {glyph:?} at {index}");
            continue;
        }
        match host.place(glyph, &attributes, &mut group, index) {
            Some(unit) => retained.push((index, glyph, attributes, center, unit)),
            None => debug!("Host couldn't represent glyph {glyph:?} at {index}"),
        }
    }

    let total_steps = retained.len();
    let mut sizes = SizeSequence::new(options.curve, params, total_steps);
    let mut placed = Vec::with_capacity(total_steps);
    for (index, glyph, attributes, center, mut unit) in retained {
        let size = sizes.pull()?;
        host.apply(&mut unit, size, center);
        placed.push(PlacedGlyph {
            index,
            glyph,
            attributes,
            center,
            size,
            unit,
        });
    }
    debug_assert_eq!(placed.len(), total_steps);
    debug!(
        "Split '{}' into {} units with {} curve",
        request.name,
        placed.len(),
        options.curve
    );
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::{split_text, GlyphPlacer, GroupFactory, SplitOptions, SplitRequest, Transaction};
    use crate::markup::{Markup, TextSource};
    use crate::size::SizeCurve;
    use crate::Error;
    use peniko::kurbo::{BezPath, Point, Rect};

    #[derive(Default)]
    struct Recorder {
        depth: i32,
        ended: usize,
        groups: Vec<(String, usize)>,
        placed: Vec<(char, usize)>,
        applied: Vec<(char, f32, Point)>,
        reject: Vec<char>,
    }

    impl Transaction for Recorder {
        fn begin(&mut self) {
            self.depth += 1;
        }

        fn end(&mut self) {
            self.depth -= 1;
            self.ended += 1;
        }
    }

    impl GroupFactory for Recorder {
        type Group = usize;

        fn new_group(&mut self, name: &str, stack_position: usize) -> usize {
            assert_eq!(self.depth, 1, "group created outside transaction");
            self.groups.push((name.to_owned(), stack_position));
            self.groups.len() - 1
        }
    }

    impl GlyphPlacer for Recorder {
        type Unit = char;

        fn place(
            &mut self,
            glyph: char,
            _: &crate::Attributes,
            _: &mut usize,
            index: usize,
        ) -> Option<char> {
            if self.reject.contains(&glyph) {
                return None;
            }
            self.placed.push((glyph, index));
            Some(glyph)
        }

        fn apply(&mut self, unit: &mut char, size: f32, center: Point) {
            self.applied.push((*unit, size, center));
        }
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 40.0)
    }

    #[test]
    fn plain_text_linear() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(TextSource::Plain("Hi".into()), "Title", bounds());
        let options = SplitOptions {
            curve: SizeCurve::Linear,
            start_size: 10.0,
            end_size: 30.0,
            ..SplitOptions::default()
        };
        let placed = split_text(&mut host, &request, &options).unwrap();
        let sizes: Vec<_> = placed.iter().map(|p| p.size).collect();
        assert_eq!(sizes, [10.0, 30.0]);
        assert!(placed.iter().all(|p| p.center == Point::new(50.0, 20.0)));
        assert_eq!(host.groups, [("Split 'Title'".to_owned(), 1)]);
        assert_eq!(host.ended, 1);
        assert_eq!(host.depth, 0);
    }

    #[test]
    fn whitespace_is_skipped_without_asking_host() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(TextSource::Plain("a b\n".into()), "t", bounds());
        let placed = split_text(&mut host, &request, &SplitOptions::constant(12.0)).unwrap();
        assert_eq!(host.placed, [('a', 0), ('b', 2)]);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].index, 2);
        assert!(placed.iter().all(|p| p.size == 12.0));
    }

    #[test]
    fn skipped_glyphs_keep_their_spacing() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((40.0, 0.0));
        let mut host = Recorder {
            reject: vec!['x'],
            ..Recorder::default()
        };
        let mut request = SplitRequest::new(TextSource::Plain("ax c".into()), "t", bounds());
        request.path = Some(&path);
        let options = SplitOptions {
            start_size: 10.0,
            end_size: 20.0,
            space_on_path: true,
            ..SplitOptions::default()
        };
        let placed = split_text(&mut host, &request, &options).unwrap();
        let summary: Vec<_> = placed
            .iter()
            .map(|p| (p.glyph, p.center.x, p.size))
            .collect();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].0, 'a');
        assert!(summary[0].1.abs() < 1e-6);
        assert_eq!(summary[1].0, 'c');
        assert!((summary[1].1 - 40.0).abs() < 1e-6);
        assert_eq!(summary[0].2, 10.0);
        assert_eq!(summary[1].2, 20.0);
        assert_eq!(host.applied.len(), 2);
    }

    #[test]
    fn markup_attributes_reach_host() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(
            TextSource::Markup(Markup::fragment("<b>A</b>B")),
            "t",
            bounds(),
        );
        let placed = split_text(&mut host, &request, &SplitOptions::default()).unwrap();
        assert_eq!(placed[0].glyph, 'A');
        assert!(placed[0].attributes.bold);
        assert_eq!(placed[1].glyph, 'B');
        assert!(!placed[1].attributes.bold);
    }

    #[test]
    fn failure_still_ends_transaction() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(TextSource::Plain("abc".into()), "t", bounds());
        let options = SplitOptions {
            space_on_path: true,
            ..SplitOptions::default()
        };
        let result = split_text(&mut host, &request, &options);
        assert!(matches!(result, Err(Error::NoActivePath)));
        assert_eq!(host.ended, 1);
        assert_eq!(host.depth, 0);
        assert!(host.groups.is_empty());
    }

    #[test]
    fn invalid_range_fails_before_placing() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(TextSource::Plain("abc".into()), "t", bounds());
        let options = SplitOptions {
            start_size: 10.0,
            lower_limit: 50.0,
            ..SplitOptions::default()
        };
        let result = split_text(&mut host, &request, &options);
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
        assert!(host.placed.is_empty());
        assert_eq!(host.ended, 1);
    }

    #[test]
    fn nothing_placeable() {
        let mut host = Recorder::default();
        let request = SplitRequest::new(TextSource::Plain(" \t".into()), "t", bounds());
        let placed = split_text(&mut host, &request, &SplitOptions::default()).unwrap();
        assert!(placed.is_empty());
        assert_eq!(host.groups.len(), 1);
    }
}
