use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PassError, PassResult};

/// Decoded raster, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PassResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8], opts: &usvg::Options<'_>) -> PassResult<usvg::Tree> {
    let tree = usvg::Tree::from_data(bytes, opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG so that its height becomes `target_height` pixels.
pub fn rasterize_svg_to_height(tree: &usvg::Tree, target_height: u32) -> PassResult<PreparedImage> {
    let size = tree.size();
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(size.width()) || !valid(size.height()) {
        return Err(PassError::validation("svg has invalid width/height"));
    }
    let scale = target_height as f32 / size.height();
    let width = ((size.width() * scale).ceil() as u32).max(1);
    let height = target_height.max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PassError::validation("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
