// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Formatting state attached to each glyph.

use std::sync::Arc;

use peniko::color::{palette, AlphaColor, Srgb};

/// The name of the font used when nothing else is specified.
pub const DEFAULT_FONT: &str = "Times New Roman";
/// The font size used when nothing else is specified.
pub const DEFAULT_SIZE: f32 = 30.0;

/// A resolved formatting snapshot.
///
/// Values are never mutated in place: [`with_toggle`](Self::with_toggle) and
/// [`with_style`](Self::with_style) return a new value, so a glyph keeps the
/// snapshot it was emitted with regardless of what happens afterwards.
#[derive(Clone, Debug)]
pub struct Attributes {
    /// Font family name.
    pub font: Arc<str>,
    /// Font size in pixels.
    ///
    /// This is advisory; the size sequence decides the final size of each glyph.
    pub size: f32,
    /// Foreground color.
    pub color: AlphaColor<Srgb>,
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
    /// Strikethrough flag.
    pub strikethrough: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(DEFAULT_FONT, DEFAULT_SIZE, palette::css::BLACK)
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.font == other.font
            && self.size == other.size
            && self.color.components == other.color.components
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
    }
}

impl Attributes {
    /// Create attributes with all four style flags turned off.
    pub fn new(font: impl Into<Arc<str>>, size: f32, color: AlphaColor<Srgb>) -> Self {
        Self {
            font: font.into(),
            size,
            color,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }

    /// Returns the current value of a style flag.
    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Bold => self.bold,
            Toggle::Italic => self.italic,
            Toggle::Underline => self.underline,
            Toggle::Strikethrough => self.strikethrough,
        }
    }

    /// Returns a copy with one style flag set to `value`.
    #[must_use]
    pub fn with_toggle(&self, toggle: Toggle, value: bool) -> Self {
        let mut next = self.clone();
        match toggle {
            Toggle::Bold => next.bold = value,
            Toggle::Italic => next.italic = value,
            Toggle::Underline => next.underline = value,
            Toggle::Strikethrough => next.strikethrough = value,
        }
        next
    }

    /// Returns a copy with the font and color replaced where given.
    #[must_use]
    pub fn with_style(&self, font: Option<&str>, color: Option<AlphaColor<Srgb>>) -> Self {
        let mut next = self.clone();
        if let Some(font) = font {
            next.font = font.into();
        }
        if let Some(color) = color {
            next.color = color;
        }
        next
    }

    /// Take an independent copy of the current state, to attach to a glyph.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

/// One of the four boolean style flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// `<b>`
    Bold,
    /// `<i>`
    Italic,
    /// `<u>`
    Underline,
    /// `<s>`
    Strikethrough,
}

impl Toggle {
    /// Every toggle, in tag order.
    pub const ALL: [Self; 4] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
    ];

    /// Map a markup tag name to its toggle.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" => Some(Self::Bold),
            "i" => Some(Self::Italic),
            "u" => Some(Self::Underline),
            "s" => Some(Self::Strikethrough),
            _ => None,
        }
    }

    /// The markup tag name for this toggle.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Strikethrough => "s",
        }
    }
}

/// Whether font and color set by a style element outlive the element.
///
/// Toggles are always scoped to their element. Style changes are not, by
/// default: a `font` or `foreground` attribute keeps applying to everything
/// after the element closes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StyleScope {
    /// Style changes persist past the end of the element.
    #[default]
    Persistent,
    /// Style changes revert when the element closes, like toggles do.
    Scoped,
}
