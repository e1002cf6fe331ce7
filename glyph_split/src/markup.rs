// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning plain text or markup into an ordered list of glyphs.
//!
//! The markup is a small XML dialect:
//!
//! ```xml
//! <markup><span font="Sans" foreground="#ff0000">Hi <b>there</b></span>!</markup>
//! ```
//!
//! `<b>`, `<i>`, `<u>` and `<s>` switch a style flag on for their contents. Any
//! other element is a style element and may carry a `font` family and a
//! `foreground` color.

use log::debug;
use peniko::color::{parse_color, DynamicColor, Srgb};
use roxmltree::{Document, Node};

use crate::attributes::{Attributes, StyleScope, Toggle};
use crate::{Error, Result};

const CONTAINER_TAG: &str = "markup";
const FONT_ATTRIBUTE: &str = "font";
const COLOR_ATTRIBUTE: &str = "foreground";

/// One character and the formatting it was written with.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphUnit {
    /// A single code point.
    pub glyph: char,
    /// Formatting in effect where the glyph appeared.
    pub attributes: Attributes,
}

/// The text to split.
#[derive(Clone, Debug)]
pub enum TextSource {
    /// Unformatted text; every glyph gets the default attributes.
    Plain(String),
    /// A markup document.
    Markup(Markup),
}

impl TextSource {
    /// Decompose the source into glyphs, in document order.
    pub fn glyphs(&self, defaults: &Attributes, scope: StyleScope) -> Result<Vec<GlyphUnit>> {
        match self {
            Self::Plain(text) => Ok(glyphs_from_text(text, defaults)),
            Self::Markup(markup) => markup.glyphs(defaults, scope),
        }
    }
}

/// Emit one glyph per code point of `text`, all with the same attributes.
pub fn glyphs_from_text(text: &str, attributes: &Attributes) -> Vec<GlyphUnit> {
    text.chars()
        .map(|glyph| GlyphUnit {
            glyph,
            attributes: attributes.snapshot(),
        })
        .collect()
}

/// Markup source text.
///
/// Parsing is deferred until [`glyphs`](Self::glyphs) is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    source: String,
}

impl Markup {
    /// Wrap a complete document.
    ///
    /// The glyphs are read from the `markup` element: the document element if
    /// it has that name, otherwise the first descendant which does, otherwise
    /// the document element itself.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Wrap a fragment such as `<b>A</b>B` in a `markup` element.
    pub fn fragment(fragment: &str) -> Self {
        Self::new(format!("<{CONTAINER_TAG}>{fragment}</{CONTAINER_TAG}>"))
    }

    /// The document text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse the document and decompose it into glyphs, in document order.
    pub fn glyphs(&self, defaults: &Attributes, scope: StyleScope) -> Result<Vec<GlyphUnit>> {
        let doc = Document::parse(&self.source)?;
        let root = doc.root_element();
        let container = if root.has_tag_name(CONTAINER_TAG) {
            root
        } else {
            root.descendants()
                .find(|node| node.has_tag_name(CONTAINER_TAG))
                .unwrap_or(root)
        };
        let mut walker = Walker {
            scope,
            glyphs: Vec::new(),
        };
        walker.walk(container, defaults.snapshot())?;
        debug!("Parsed {} glyphs from markup", walker.glyphs.len());
        Ok(walker.glyphs)
    }
}

struct Walker {
    scope: StyleScope,
    glyphs: Vec<GlyphUnit>,
}

impl Walker {
    /// Emit the glyphs below `node`, returning the attributes in effect after it.
    fn walk(&mut self, node: Node<'_, '_>, attributes: Attributes) -> Result<Attributes> {
        if node.is_text() {
            if let Some(text) = node.text() {
                self.glyphs.extend(glyphs_from_text(text, &attributes));
            }
            return Ok(attributes);
        }
        if !node.is_element() {
            return Ok(attributes);
        }

        if let Some(toggle) = Toggle::from_tag(node.tag_name().name()) {
            let prior = attributes.toggle(toggle);
            let inner = self.walk_children(node, attributes.with_toggle(toggle, true))?;
            return Ok(inner.with_toggle(toggle, prior));
        }

        let color = node
            .attribute(COLOR_ATTRIBUTE)
            .map(parse_foreground)
            .transpose()?;
        let styled = attributes.with_style(node.attribute(FONT_ATTRIBUTE), color);
        let inner = self.walk_children(node, styled)?;
        match self.scope {
            StyleScope::Persistent => Ok(inner),
            StyleScope::Scoped => Ok(attributes),
        }
    }

    fn walk_children(&mut self, node: Node<'_, '_>, attributes: Attributes) -> Result<Attributes> {
        node.children()
            .try_fold(attributes, |attributes, child| self.walk(child, attributes))
    }
}

/// Parse a foreground color. Any alpha in the string is dropped.
fn parse_foreground(color: &str) -> Result<peniko::color::AlphaColor<Srgb>> {
    parse_color(color.trim())
        .map(DynamicColor::to_alpha_color::<Srgb>)
        .map(|color| color.with_alpha(1.0))
        .map_err(|_| Error::InvalidColor(color.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::{glyphs_from_text, parse_foreground, GlyphUnit, Markup, TextSource};
    use crate::attributes::{Attributes, StyleScope};
    use crate::Error;
    use peniko::color::{palette, AlphaColor, Srgb};

    fn assert_close_color(c1: AlphaColor<Srgb>, c2: AlphaColor<Srgb>) {
        const EPSILON: f32 = 1e-4;
        for i in 0..4 {
            assert!((c1.components[i] - c2.components[i]).abs() < EPSILON);
        }
    }

    fn parse(fragment: &str) -> Vec<GlyphUnit> {
        Markup::fragment(fragment)
            .glyphs(&Attributes::default(), StyleScope::Persistent)
            .unwrap()
    }

    fn text(glyphs: &[GlyphUnit]) -> String {
        glyphs.iter().map(|unit| unit.glyph).collect()
    }

    #[test]
    fn plain_text_uses_defaults() {
        let defaults = Attributes::default().with_style(Some("Sans"), Some(palette::css::BLUE));
        let glyphs = TextSource::Plain("Hi!".into())
            .glyphs(&defaults, StyleScope::Persistent)
            .unwrap();
        assert_eq!(text(&glyphs), "Hi!");
        assert!(glyphs.iter().all(|unit| unit.attributes == defaults));
    }

    #[test]
    fn iterates_code_points() {
        let glyphs = glyphs_from_text("né😀", &Attributes::default());
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[2].glyph, '😀');
    }

    #[test]
    fn fragment_is_wrapped() {
        let markup = Markup::fragment("<b>A</b>B");
        assert_eq!(markup.source(), "<markup><b>A</b>B</markup>");
        assert_eq!(Markup::new("plain").source(), "plain");
    }

    #[test]
    fn whitespace_is_emitted() {
        let glyphs = parse("a <b> </b>\tb");
        assert_eq!(text(&glyphs), "a  \tb");
    }

    #[test]
    fn toggle_is_scoped() {
        let glyphs = parse("<b>A</b>B");
        assert_eq!(text(&glyphs), "AB");
        assert!(glyphs[0].attributes.bold);
        assert!(!glyphs[1].attributes.bold);
    }

    #[test]
    fn nested_toggles_restore_prior_value() {
        let glyphs = parse("<b>a<i>b<b>c</b>d</i>e</b>f");
        assert_eq!(text(&glyphs), "abcdef");
        let flags: Vec<_> = glyphs
            .iter()
            .map(|unit| (unit.attributes.bold, unit.attributes.italic))
            .collect();
        assert_eq!(
            flags,
            [
                (true, false),
                (true, true),
                (true, true),
                (true, true),
                (true, false),
                (false, false),
            ]
        );
    }

    #[test]
    fn all_toggles_are_recognized() {
        let glyphs = parse("<b>1</b><i>2</i><u>3</u><s>4</s>");
        let a = &glyphs[0].attributes;
        assert!(a.bold && !a.italic && !a.underline && !a.strikethrough);
        let a = &glyphs[1].attributes;
        assert!(!a.bold && a.italic);
        assert!(glyphs[2].attributes.underline);
        assert!(glyphs[3].attributes.strikethrough);
    }

    #[test]
    fn style_persists_after_element() {
        let glyphs = parse(r##"x<span font="Sans" foreground="#00ff00">y</span>z"##);
        assert_eq!(&*glyphs[0].attributes.font, "Times New Roman");
        assert_eq!(&*glyphs[1].attributes.font, "Sans");
        assert_close_color(glyphs[1].attributes.color, palette::css::LIME);
        assert_eq!(&*glyphs[2].attributes.font, "Sans");
        assert_close_color(glyphs[2].attributes.color, palette::css::LIME);
    }

    #[test]
    fn style_persists_out_of_toggle() {
        let glyphs = parse(r#"<b><span font="Serif">a</span></b>b"#);
        assert!(!glyphs[1].attributes.bold);
        assert_eq!(&*glyphs[1].attributes.font, "Serif");
    }

    #[test]
    fn scoped_style_reverts() {
        let glyphs = Markup::fragment(r##"<span font="Sans" foreground="#f00"><b>a</b></span>b"##)
            .glyphs(&Attributes::default(), StyleScope::Scoped)
            .unwrap();
        assert_eq!(&*glyphs[0].attributes.font, "Sans");
        assert_close_color(glyphs[0].attributes.color, palette::css::RED);
        assert_eq!(glyphs[1].attributes, Attributes::default());
    }

    #[test]
    fn finds_nested_container() {
        let glyphs = Markup::new("<doc><meta>skip</meta><markup><i>k</i></markup></doc>")
            .glyphs(&Attributes::default(), StyleScope::Persistent)
            .unwrap();
        assert_eq!(text(&glyphs), "k");
        assert!(glyphs[0].attributes.italic);
    }

    #[test]
    fn falls_back_to_document_element() {
        let glyphs = Markup::new("<span>ok</span>")
            .glyphs(&Attributes::default(), StyleScope::Persistent)
            .unwrap();
        assert_eq!(text(&glyphs), "ok");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(text(&parse("a&amp;b&lt;")), "a&b<");
    }

    #[test]
    fn foreground_is_opaque() {
        let color = parse_foreground("#ff000080").unwrap();
        assert_close_color(color, palette::css::RED);
        let color = parse_foreground(" #0000ff ").unwrap();
        assert_close_color(color, palette::css::BLUE);
    }

    #[test]
    fn bad_color_is_an_error() {
        let result = Markup::fragment(r#"<span foreground="not a color">x</span>"#)
            .glyphs(&Attributes::default(), StyleScope::Persistent);
        assert!(matches!(result, Err(Error::InvalidColor(color)) if color == "not a color"));
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let result = Markup::new("<markup><b>x</markup>")
            .glyphs(&Attributes::default(), StyleScope::Persistent);
        assert!(matches!(result, Err(Error::Markup(_))));
    }
}
