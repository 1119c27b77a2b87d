use resvg::tiny_skia::{
    FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint,
    SpreadMode, Transform,
};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{PassError, PassResult};
use crate::render::region::{LogoOverlay, PassRegion, PhotoOverlay};

/// A captured pass as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// The "region to raster" step of an export.
///
/// Implementations are synchronous and CPU bound; [`crate::ExportPipeline`] runs them on the
/// blocking pool. A failure here is always reported as [`PassError::Capture`].
pub trait SnapshotCapability: Send + Sync {
    /// Rasterize `region` at `scale` device pixels per logical pixel.
    fn capture(&self, region: &PassRegion, scale: f32) -> PassResult<CapturedImage>;
}

/// CPU capture: `usvg` parse, `resvg` render, then tiny-skia compositing of logo and photo.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResvgSnapshot;

impl SnapshotCapability for ResvgSnapshot {
    #[tracing::instrument(skip(self, region))]
    fn capture(&self, region: &PassRegion, scale: f32) -> PassResult<CapturedImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PassError::capture(format!(
                "capture scale must be positive (got {scale})"
            )));
        }

        let opts = usvg::Options {
            fontdb: region.fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(region.svg(), &opts)
            .map_err(|e| PassError::capture(format!("parse pass svg: {e}")))?;

        let size = region.size();
        let width = ((size.width * f64::from(scale)).ceil() as u32).max(1);
        let height = ((size.height * f64::from(scale)).ceil() as u32).max(1);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PassError::capture(format!("failed to allocate {width}x{height} pixmap"))
        })?;

        let root = Transform::from_scale(scale, scale);
        resvg::render(&tree, root, &mut pixmap.as_mut());

        if let Some(logo) = region.logo() {
            draw_logo(&mut pixmap, logo, root)?;
        }
        if let Some(photo) = region.photo() {
            draw_photo(&mut pixmap, photo, root)?;
        }

        tracing::debug!(width, height, "captured pass");
        Ok(CapturedImage {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

fn to_pixmap(img: &PreparedImage) -> PassResult<Pixmap> {
    let size = IntSize::from_wh(img.width, img.height)
        .ok_or_else(|| PassError::capture("overlay image has zero size"))?;
    Pixmap::from_vec(img.rgba8_premul.as_ref().clone(), size)
        .ok_or_else(|| PassError::capture("overlay image buffer does not match its size"))
}

fn draw_logo(pixmap: &mut Pixmap, logo: &LogoOverlay, root: Transform) -> PassResult<()> {
    let src = to_pixmap(&logo.image)?;
    let (iw, ih) = (f64::from(logo.image.width), f64::from(logo.image.height));
    let slot = logo.slot;
    let s = (slot.width() / iw).min(slot.height() / ih);
    let center = slot.center();
    let x = center.x - iw * s / 2.0;
    let y = center.y - ih * s / 2.0;

    let local = Transform::from_row(s as f32, 0.0, 0.0, s as f32, x as f32, y as f32);
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, root.pre_concat(local), None);
    Ok(())
}

fn draw_photo(pixmap: &mut Pixmap, photo: &PhotoOverlay, root: Transform) -> PassResult<()> {
    let bytes = photo.image.decode_bytes()?;
    let decoded = decode_image(&bytes)
        .map_err(|e| PassError::capture(format!("decode profile image: {e}")))?;
    let src = to_pixmap(&decoded)?;

    // Cover the circle's bounding square, centered (object-fit: cover).
    let (iw, ih) = (f64::from(decoded.width), f64::from(decoded.height));
    let c = photo.circle;
    let d = c.radius * 2.0;
    let s = (d / iw).max(d / ih);
    let x = c.center.x - iw * s / 2.0;
    let y = c.center.y - ih * s / 2.0;

    let shader = Pattern::new(
        src.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bicubic,
        1.0,
        Transform::from_row(s as f32, 0.0, 0.0, s as f32, x as f32, y as f32),
    );
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    };
    let path = PathBuilder::from_circle(c.center.x as f32, c.center.y as f32, c.radius as f32)
        .ok_or_else(|| PassError::capture("invalid photo clip circle"))?;
    pixmap.fill_path(&path, &paint, FillRule::Winding, root, None);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/snapshot.rs"]
mod tests;
