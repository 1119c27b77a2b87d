use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::capture::snapshot::CapturedImage;
use crate::form::fields::PassFields;
use crate::foundation::error::{PassError, PassResult};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// One exported pass, ready for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `data:image/png;base64,...`
    pub image_data_uri: String,
    pub suggested_filename: String,
    pub png: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl ExportArtifact {
    pub fn new(png: Vec<u8>, width: u32, height: u32, suggested_filename: String) -> Self {
        Self {
            image_data_uri: png_data_uri(&png),
            suggested_filename,
            png: Arc::from(png),
            width,
            height,
        }
    }
}

/// `{first|access}-{last|pass}-{epoch_millis}.png`
pub fn suggested_filename(fields: &PassFields, epoch_millis: i64) -> String {
    let first = if fields.first_name.is_empty() {
        "access"
    } else {
        &fields.first_name
    };
    let last = if fields.last_name.is_empty() {
        "pass"
    } else {
        &fields.last_name
    };
    format!("{first}-{last}-{epoch_millis}.png")
}

pub fn png_data_uri(png: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png);
    format!("{PNG_DATA_URI_PREFIX}{b64}")
}

/// Encode a captured image as PNG (straight alpha).
pub fn encode_png(img: &CapturedImage) -> PassResult<Vec<u8>> {
    let expected = (img.width as usize) * (img.height as usize) * 4;
    if img.data.len() != expected {
        return Err(PassError::capture(format!(
            "captured buffer is {} bytes, expected {expected} for {}x{}",
            img.data.len(),
            img.width,
            img.height
        )));
    }

    let mut data = img.data.clone();
    if img.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let rgba = image::RgbaImage::from_raw(img.width, img.height, data)
        .ok_or_else(|| PassError::capture("captured buffer does not fit its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")
        .map_err(|e| PassError::capture(format!("{e:#}")))?;
    Ok(buf)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/artifact.rs"]
mod tests;
