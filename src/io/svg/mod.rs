//! SVG choropleth export with the current selection highlighted.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::{
    feature::Feature,
    store::SelectionStore,
    view::{StyleConfig, StylePainter},
};

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Canvas size. The map is scaled to fit inside `width` x `max_height`,
/// centred horizontally; the image is only as tall as the map needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub width: f64,
    pub max_height: f64,
    pub margin: f64,
}

impl Default for SvgOptions {
    fn default() -> Self { Self { width: 1200.0, max_height: 1200.0, margin: 10.0 } }
}

impl SvgOptions {
    fn validate(&self) -> Result<()> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            bail!("[to_svg] margin must be a non-negative number, got {}", self.margin);
        }
        for (name, value) in [("width", self.width), ("max height", self.max_height)] {
            if !(value.is_finite() && value > 2.0 * self.margin) {
                bail!("[to_svg] {name} {value} leaves no room inside a {} px margin", self.margin);
            }
        }
        Ok(())
    }
}

/// Pixel frame for a lon/lat box: uniform scale plus top-left offset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn fit(bounds: &Rect<f64>, options: &SvgOptions) -> Self {
        let room_x = options.width - 2.0 * options.margin;
        let room_y = options.max_height - 2.0 * options.margin;

        let fit = |room: f64, span: f64| if span > 0.0 { room / span } else { f64::INFINITY };
        let scale = fit(room_x, bounds.width()).min(fit(room_y, bounds.height()));
        // A single point has no extent to fit.
        let scale = if scale.is_finite() { scale } else { 1.0 };

        Self {
            scale,
            offset_x: options.margin + (room_x - bounds.width() * scale) / 2.0,
            offset_y: options.margin,
            width: options.width,
            height: bounds.height() * scale + 2.0 * options.margin,
        }
    }
}

/// Render the loaded collection as an SVG string.
pub fn render_svg(store: &SelectionStore, config: &StyleConfig, options: &SvgOptions) -> Result<String> {
    let mut buffer = Vec::new();
    draw_map(&mut buffer, store, config, options)?;
    String::from_utf8(buffer).context("[to_svg] SVG output is not valid UTF-8")
}

/// Render the loaded collection to an SVG file at `path`.
pub fn write_svg(path: &Path, store: &SelectionStore, config: &StyleConfig, options: &SvgOptions) -> Result<()> {
    options.validate()?;
    let file = File::create(path)
        .with_context(|| format!("[to_svg] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    draw_map(&mut writer, store, config, options)?;
    writer.flush()?;
    Ok(())
}

fn draw_map<W: Write>(writer: &mut W, store: &SelectionStore, config: &StyleConfig, options: &SvgOptions) -> Result<()> {
    options.validate()?;

    let collection = store.collection()
        .ok_or_else(|| anyhow!("[to_svg] No constituencies loaded; nothing to draw."))?;

    let bounds = collection.bounds()
        .ok_or_else(|| anyhow!("[to_svg] Could not determine bounds; nothing to draw."))?;

    let frame = Frame::fit(&bounds, options);

    // --- Map lon/lat -> SVG coords (Y down) ---
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = frame.offset_x + (coord.x - bounds.min().x) * frame.scale;
        let y = frame.offset_y + (bounds.max().y - coord.y) * frame.scale;
        (x, y)
    };

    open_document(writer, &frame, &bounds)?;

    let painter = StylePainter::new(store, config);

    // Selected boundary last so its outline is not covered by neighbours.
    let (selected, others): (Vec<&Feature>, Vec<&Feature>) = collection.iter()
        .filter(|f| !f.geometry.0.is_empty())
        .partition(|f| painter.is_selected(f));

    for feature in others.into_iter().chain(selected) {
        draw_feature(writer, feature, &painter, &project)?;
    }

    writeln!(writer, "</svg>")?;
    Ok(())
}

/// XML prolog, `<svg>` root carrying the lon/lat frame (so a host can map
/// clicks back to coordinates), background and shared path styling.
fn open_document<W: Write>(writer: &mut W, frame: &Frame, bounds: &Rect<f64>) -> Result<()> {
    let Frame { scale, offset_x, offset_y, width, height } = *frame;
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" data-lon-min="{}" data-lon-max="{}" data-lat-min="{}" data-lat-max="{}" data-offset-x="{offset_x}" data-offset-y="{offset_y}" data-scale="{scale}">"#,
        bounds.min().x, bounds.max().x, bounds.min().y, bounds.max().y,
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    writeln!(writer, "<style>.constituency {{ stroke-linejoin: round; vector-effect: non-scaling-stroke; }}</style>")?;
    Ok(())
}

fn draw_feature<W: Write>(writer: &mut W, feature: &Feature, painter: &StylePainter<'_>, project: &Projection) -> Result<()> {
    let style = painter.style(feature);
    let class = if painter.is_selected(feature) { "constituency selected" } else { "constituency" };

    writeln!(
        writer,
        r#"<path class="{class}" data-id="{id}" data-name="{name}" d="{d}" fill="{fill}" fill-opacity="{fill_opacity}" stroke="{stroke}" stroke-width="{stroke_width}" fill-rule="evenodd"/>"#,
        id = feature.id,
        name = escape_attr(&feature.label()),
        d = multipolygon_to_path(&feature.geometry, project),
        fill = escape_attr(&style.fill_color),
        fill_opacity = style.fill_opacity,
        stroke = escape_attr(&style.stroke_color),
        stroke_width = style.stroke_weight,
    )?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out.trim_start().to_string()
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
