use std::fmt::{self, Write as _};

use crate::foundation::core::{Rect, Rgb8};
use crate::render::layout::{GRID_STEP, PassLayout, TextLine};

const FONT_FAMILY: &str = "'Gotham Bold', 'Arial Bold', 'Helvetica Neue', Arial, sans-serif";
const PLACEHOLDER_FILL: Rgb8 = Rgb8::from_hex(0x9CA3AF);
const PLACEHOLDER_FIGURE: Rgb8 = Rgb8::from_hex(0xE5E7EB);
const PHOTO_BACKDROP: Rgb8 = Rgb8::from_hex(0x1F2937);
const GRID_OPACITY: f64 = 0.3;
// Baseline offset from the middle of a line box, as a fraction of the font size.
const BASELINE_SHIFT: f64 = 0.35;

/// Serialize a layout as a standalone SVG document.
///
/// When `draw_wordmark` is set the header carries the tier wordmark; otherwise the header is
/// left empty for a raster logo overlay. The profile photo is never embedded: the ring and a
/// backdrop (or the placeholder figure) are drawn and the photo is composited at capture time.
pub fn write_svg(layout: &PassLayout, draw_wordmark: bool) -> String {
    let mut out = String::with_capacity(8 * 1024);
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, layout, draw_wordmark);
    out
}

fn write_document(out: &mut String, l: &PassLayout, draw_wordmark: bool) -> fmt::Result {
    let (w, h) = (l.size.width, l.size.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    writeln!(out, "<defs>")?;
    writeln!(
        out,
        r#"<clipPath id="card"><rect x="0" y="0" width="{w}" height="{h}" rx="{r}" ry="{r}"/></clipPath>"#,
        r = l.corner_radius
    )?;
    write!(out, r#"<clipPath id="body">"#)?;
    write_rect(out, l.body, None)?;
    writeln!(out, "</clipPath>")?;
    let photo = l.photo.inner_circle();
    writeln!(
        out,
        r#"<clipPath id="photo"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
        photo.center.x, photo.center.y, photo.radius
    )?;
    writeln!(out, "</defs>")?;

    writeln!(out, r#"<g clip-path="url(#card)">"#)?;
    write_rect(out, Rect::new(0.0, 0.0, w, h), Some(l.body_fill))?;

    write_rect(out, l.header.rect, Some(l.header.fill))?;
    if draw_wordmark {
        write_text(out, &l.header.wordmark)?;
    }

    write_grid(out, l.body)?;
    write_photo_slot(out, l)?;

    write_text(out, &l.name)?;
    for block in &l.blocks {
        write_rect(out, block.rect, Some(block.fill))?;
        write_text(out, &block.label)?;
    }

    let (y, x0, x1) = l.divider;
    writeln!(
        out,
        r#"<line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="{}" stroke-width="1"/>"#,
        l.divider_color.to_css()
    )?;
    write_text(out, &l.id_line)?;
    write_text(out, &l.expiry_line)?;

    write_rect(out, l.footer, Some(Rgb8::BLACK))?;
    write_text(out, &l.footer_text)?;

    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")
}

fn write_rect(out: &mut String, r: Rect, fill: Option<Rgb8>) -> fmt::Result {
    write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height()
    )?;
    if let Some(fill) = fill {
        write!(out, r#" fill="{}""#, fill.to_css())?;
    }
    writeln!(out, "/>")
}

fn write_grid(out: &mut String, body: Rect) -> fmt::Result {
    writeln!(
        out,
        r##"<g clip-path="url(#body)" stroke="#FFFFFF" stroke-opacity="{GRID_OPACITY}" stroke-width="1">"##
    )?;
    let mut x = body.x0 + grid_offset(body.width());
    while x < body.x1 {
        writeln!(
            out,
            r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}"/>"#,
            body.y0, body.y1
        )?;
        x += GRID_STEP;
    }
    let mut y = body.y0 + grid_offset(body.height());
    while y < body.y1 {
        writeln!(
            out,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}"/>"#,
            body.x0, body.x1
        )?;
        y += GRID_STEP;
    }
    writeln!(out, "</g>")
}

/// First line position for a grid of `GRID_STEP` tiles centered on an extent.
pub(crate) fn grid_offset(extent: f64) -> f64 {
    (extent / 2.0 - GRID_STEP / 2.0).rem_euclid(GRID_STEP)
}

fn write_photo_slot(out: &mut String, l: &PassLayout) -> fmt::Result {
    let slot = &l.photo;
    let inner = slot.inner_circle();
    let (cx, cy, r) = (inner.center.x, inner.center.y, inner.radius);

    if slot.image.is_some() {
        writeln!(
            out,
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
            PHOTO_BACKDROP.to_css()
        )?;
    } else {
        writeln!(
            out,
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
            PLACEHOLDER_FILL.to_css()
        )?;
        // Head and shoulders silhouette.
        writeln!(
            out,
            r#"<g clip-path="url(#photo)" fill="{}">"#,
            PLACEHOLDER_FIGURE.to_css()
        )?;
        writeln!(
            out,
            r#"<circle cx="{cx}" cy="{}" r="{}"/>"#,
            cy - r * 0.2,
            r * 0.32
        )?;
        writeln!(
            out,
            r#"<ellipse cx="{cx}" cy="{}" rx="{}" ry="{}"/>"#,
            cy + r * 0.75,
            r * 0.62,
            r * 0.5
        )?;
        writeln!(out, "</g>")?;
    }

    let ring_r = slot.circle.radius - slot.ring_width / 2.0;
    writeln!(
        out,
        r#"<circle cx="{}" cy="{}" r="{ring_r}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        slot.circle.center.x,
        slot.circle.center.y,
        slot.ring_color.to_css(),
        slot.ring_width
    )
}

fn write_text(out: &mut String, t: &TextLine) -> fmt::Result {
    writeln!(
        out,
        r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="700" letter-spacing="{}" fill="{}" text-anchor="middle">{}</text>"#,
        t.center.x,
        t.center.y + t.size * BASELINE_SHIFT,
        t.size,
        t.size * 0.02,
        t.color.to_css(),
        escape_xml(&t.text)
    )
}

/// Escape text for use inside SVG element content or attribute values.
///
/// Characters XML cannot carry at all (C0 controls other than tab/LF/CR, U+FFFE, U+FFFF) are
/// dropped.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
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

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
