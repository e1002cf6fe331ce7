// Copyright 2025 the Glyph Split Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split text into one unit per glyph and print where each unit ends up.

mod host;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use glyph_split::color::{parse_color, AlphaColor, DynamicColor, Srgb};
use glyph_split::kurbo::{BezPath, Rect};
use glyph_split::{
    split_text, Attributes, Markup, SizeCurve, SplitOptions, SplitRequest, StyleScope, TextSource,
};

use host::{to_font_ref, RecordingHost};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.list_curves {
        println!("Available curves:");
        for curve in SizeCurve::ALL {
            println!("  {} ({})", curve.name(), curve.label());
        }
        return Ok(());
    }

    let source = args.source()?;
    let path = args
        .path
        .as_deref()
        .map(BezPath::from_svg)
        .transpose()
        .context("couldn't parse --path as SVG path data")?;
    let font_data = match &args.font_file {
        Some(file) => {
            let data = std::fs::read(file)
                .with_context(|| format!("couldn't read {}", file.display()))?;
            Some(data)
        }
        None => None,
    };
    let font = match &font_data {
        Some(data) => Some(to_font_ref(data).context("--font-file is not a font")?),
        None => None,
    };

    let mut request = SplitRequest::new(source, &args.name, args.bounds);
    request.defaults = Attributes::new(args.font.as_str(), args.font_size, args.color);
    request.path = path.as_ref();
    request.style_scope = if args.scoped_style {
        StyleScope::Scoped
    } else {
        StyleScope::Persistent
    };
    let options = SplitOptions {
        curve: args.curve,
        start_size: args.start_size,
        end_size: args.end_size,
        lower_limit: args.lower_limit,
        upper_limit: args.upper_limit,
        space_on_path: args.space_on_path,
    };

    let mut host = RecordingHost::new(font);
    let placed = split_text(&mut host, &request, &options)?;
    for group in &host.groups {
        println!(
            "{} (stack position {}, {} units)",
            group.name, group.stack_position, group.len
        );
    }
    for glyph in placed {
        let unit = glyph.unit;
        let flags: String = ['B', 'I', 'U', 'S']
            .into_iter()
            .zip(unit.flags)
            .map(|(flag, set)| if set { flag } else { '-' })
            .collect();
        println!(
            "{:>4} {:?} center=({:.2}, {:.2}) size={:.2} font={:?} color={} {flags}",
            glyph.index,
            unit.glyph,
            unit.center.x,
            unit.center.y,
            unit.size,
            unit.font,
            to_hex(unit.color),
        );
    }
    Ok(())
}

fn to_hex(color: AlphaColor<Srgb>) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn parse_bounds(bounds: &str) -> Result<Rect, String> {
    let values = bounds
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    match values.as_slice() {
        &[x0, y0, x1, y1] => Ok(Rect::new(x0, y0, x1, y1)),
        _ => Err(format!("expected X0,Y0,X1,Y1, got {bounds:?}")),
    }
}

fn parse_opaque_color(color: &str) -> Result<AlphaColor<Srgb>, String> {
    parse_color(color)
        .map(DynamicColor::to_alpha_color::<Srgb>)
        .map(|color| color.with_alpha(1.0))
        .map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name = "cargo run -p glyph_split_cli --")]
#[command(group(ArgGroup::new("source").args(["text", "markup", "markup_file", "list_curves"]).required(true)))]
struct Args {
    /// Plain text to split
    #[arg(long, short)]
    text: Option<String>,
    /// Markup to split, such as `<b>A</b>B`
    #[arg(long, short)]
    markup: Option<String>,
    /// A file holding the markup to split
    #[arg(long)]
    markup_file: Option<PathBuf>,
    /// The size curve, see --list-curves
    #[arg(long, short, default_value = "Linear")]
    curve: SizeCurve,
    #[arg(long, default_value_t = 30.0)]
    start_size: f32,
    #[arg(long, default_value_t = 30.0)]
    end_size: f32,
    #[arg(long, default_value_t = 5.0)]
    lower_limit: f32,
    #[arg(long, default_value_t = 50.0)]
    upper_limit: f32,
    /// SVG path data to space the glyphs along
    #[arg(long)]
    path: Option<String>,
    /// Space the glyphs along --path rather than stacking them on the center of --bounds
    #[arg(long)]
    space_on_path: bool,
    /// The bounds of the source text, as X0,Y0,X1,Y1
    #[arg(long, default_value = "0,0,200,50", value_parser = parse_bounds)]
    bounds: Rect,
    /// The default font family
    #[arg(long, default_value = "Times New Roman")]
    font: String,
    /// The default font size
    #[arg(long, default_value_t = 30.0)]
    font_size: f32,
    /// The default color, such as "#000000"
    #[arg(long, default_value = "#000000", value_parser = parse_opaque_color)]
    color: AlphaColor<Srgb>,
    /// Only place glyphs which this font file covers
    #[arg(long)]
    font_file: Option<PathBuf>,
    /// Revert font and color changes at the end of each markup element
    #[arg(long)]
    scoped_style: bool,
    /// The name of the source text
    #[arg(long, default_value = "Text")]
    name: String,
    /// Display a list of all curve names
    #[arg(long)]
    list_curves: bool,
}

impl Args {
    fn source(&self) -> Result<TextSource> {
        Ok(match (&self.text, &self.markup, &self.markup_file) {
            (Some(text), None, None) => TextSource::Plain(text.clone()),
            (None, Some(markup), None) => TextSource::Markup(Markup::fragment(markup)),
            (None, None, Some(file)) => {
                let markup = std::fs::read_to_string(file)
                    .with_context(|| format!("couldn't read {}", file.display()))?;
                TextSource::Markup(Markup::new(markup))
            }
            _ => bail!("expected exactly one of --text, --markup or --markup-file"),
        })
    }
}
