use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::store::PassAssets;
use crate::form::fields::ProfileImage;
use crate::foundation::core::{Circle, Rect, Size};
use crate::render::layout::PassLayout;
use crate::render::svg::write_svg;

/// Raster drawn on top of the vector card.
#[derive(Clone, Debug)]
pub struct LogoOverlay {
    pub image: PreparedImage,
    pub slot: Rect,
}

/// Profile photo clipped into the ring. Still encoded; decoded at capture time.
#[derive(Clone, Debug)]
pub struct PhotoOverlay {
    pub image: ProfileImage,
    pub circle: Circle,
}

/// A capturable pass: vector card plus the rasters composited over it.
#[derive(Clone, Debug)]
pub struct PassRegion {
    svg: String,
    size: Size,
    logo: Option<LogoOverlay>,
    photo: Option<PhotoOverlay>,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl PassRegion {
    /// Assemble the region for a layout, resolving the header logo against `assets`.
    pub fn new(layout: &PassLayout, assets: &PassAssets) -> Self {
        let logo = assets.logo(layout.header.logo).map(|image| LogoOverlay {
            image: image.clone(),
            slot: layout.header.logo_slot,
        });
        let photo = layout.photo.image.as_ref().map(|image| PhotoOverlay {
            image: image.clone(),
            circle: layout.photo.inner_circle(),
        });
        Self {
            svg: write_svg(layout, logo.is_none()),
            size: layout.size,
            logo,
            photo,
            fontdb: assets.fontdb(),
        }
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Logical size in CSS pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn logo(&self) -> Option<&LogoOverlay> {
        self.logo.as_ref()
    }

    pub fn photo(&self) -> Option<&PhotoOverlay> {
        self.photo.as_ref()
    }

    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.fontdb)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/region.rs"]
mod tests;
