// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host which records what a split would create.

use glyph_split::color::{AlphaColor, Srgb};
use glyph_split::kurbo::Point;
use glyph_split::{Attributes, GlyphPlacer, GroupFactory, Transaction};
use skrifa::charmap::Charmap;
use skrifa::raw::{FileRef, FontRef};
use skrifa::MetadataProvider;

/// A text unit, one per placed glyph.
#[derive(Debug, Clone)]
pub struct TextUnit {
    pub glyph: char,
    pub font: String,
    pub color: AlphaColor<Srgb>,
    pub flags: [bool; 4],
    pub size: f32,
    pub center: Point,
}

/// A named group of units.
#[derive(Debug)]
pub struct UnitGroup {
    pub name: String,
    pub stack_position: usize,
    pub len: usize,
}

/// Records groups and units, optionally refusing glyphs a font doesn't cover.
pub struct RecordingHost<'a> {
    charmap: Option<Charmap<'a>>,
    pub groups: Vec<UnitGroup>,
    open: bool,
}

impl<'a> RecordingHost<'a> {
    pub fn new(font: Option<FontRef<'a>>) -> Self {
        Self {
            charmap: font.map(|font| font.charmap()),
            groups: Vec::new(),
            open: false,
        }
    }

    fn covers(&self, glyph: char) -> bool {
        self.charmap
            .as_ref()
            .is_none_or(|charmap| charmap.map(glyph).is_some())
    }
}

impl Transaction for RecordingHost<'_> {
    fn begin(&mut self) {
        log::debug!("Begin split");
        self.open = true;
    }

    fn end(&mut self) {
        if !self.open {
            log::warn!("Ended a split which was never begun");
        }
        log::debug!("End split");
        self.open = false;
    }
}

impl GroupFactory for RecordingHost<'_> {
    type Group = usize;

    fn new_group(&mut self, name: &str, stack_position: usize) -> usize {
        self.groups.push(UnitGroup {
            name: name.to_owned(),
            stack_position,
            len: 0,
        });
        self.groups.len() - 1
    }
}

impl GlyphPlacer for RecordingHost<'_> {
    type Unit = TextUnit;

    fn place(
        &mut self,
        glyph: char,
        attributes: &Attributes,
        group: &mut usize,
        index: usize,
    ) -> Option<TextUnit> {
        if !self.covers(glyph) {
            log::info!("Font has no glyph for {glyph:?} at {index}, skipping");
            return None;
        }
        self.groups[*group].len += 1;
        Some(TextUnit {
            glyph,
            font: attributes.font.to_string(),
            color: attributes.color,
            flags: [
                attributes.bold,
                attributes.italic,
                attributes.underline,
                attributes.strikethrough,
            ],
            size: attributes.size,
            center: Point::ZERO,
        })
    }

    fn apply(&mut self, unit: &mut TextUnit, size: f32, center: Point) {
        unit.size = size;
        unit.center = center;
    }
}

/// Get the first font out of a font file or collection.
pub fn to_font_ref(data: &[u8]) -> Option<FontRef<'_>> {
    match FileRef::new(data).ok()? {
        FileRef::Font(font) => Some(font),
        FileRef::Collection(collection) => collection.get(0).ok(),
    }
}
