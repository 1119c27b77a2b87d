use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{PreparedImage, decode_image, parse_svg, rasterize_svg_to_height};
use crate::derive::presentation::LogoRef;
use crate::foundation::error::{PassError, PassResult};

/// Pixel height SVG logos are rasterized at (3x the 48px header slot).
const LOGO_RASTER_HEIGHT: u32 = 144;

/// Fonts and tier logos, loaded once up front.
///
/// Rendering and capture never touch the filesystem; everything they need is resolved here.
#[derive(Clone, Debug)]
pub struct PassAssets {
    fontdb: Arc<usvg::fontdb::Database>,
    logos: BTreeMap<LogoRef, PreparedImage>,
}

impl Default for PassAssets {
    fn default() -> Self {
        Self::empty()
    }
}

impl PassAssets {
    /// No fonts and no logos. Text renders as nothing and logos fall back to wordmarks.
    pub fn empty() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
            logos: BTreeMap::new(),
        }
    }

    /// Load fonts (optionally the system set, plus `<dir>/fonts`) and any logo files found
    /// as `<dir>/<stem>.png` or `<dir>/<stem>.svg`.
    ///
    /// Missing logos are skipped; unreadable or undecodable ones are an error.
    #[tracing::instrument]
    pub fn load(assets_dir: Option<&Path>, system_fonts: bool) -> PassResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        if system_fonts {
            db.load_system_fonts();
        }
        if let Some(dir) = assets_dir {
            load_fonts_from_dir(&mut db, &dir.join("fonts"));
            load_fonts_from_dir(&mut db, dir);
        }
        let fontdb = Arc::new(db);
        tracing::debug!(faces = fontdb.faces().count(), "font database ready");

        let mut logos = BTreeMap::new();
        if let Some(dir) = assets_dir {
            for logo in LogoRef::ALL {
                if let Some(img) = load_logo(dir, logo, &fontdb)? {
                    tracing::debug!(logo = logo.file_stem(), img.width, img.height, "loaded logo");
                    logos.insert(logo, img);
                } else {
                    tracing::debug!(logo = logo.file_stem(), "logo not found, using wordmark");
                }
            }
        }

        Ok(Self { fontdb, logos })
    }

    /// Replace one logo with an already decoded image.
    pub fn with_logo(mut self, logo: LogoRef, image: PreparedImage) -> Self {
        self.logos.insert(logo, image);
        self
    }

    pub fn logo(&self, logo: LogoRef) -> Option<&PreparedImage> {
        self.logos.get(&logo)
    }

    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.fontdb)
    }

    pub fn font_face_count(&self) -> usize {
        self.fontdb.faces().count()
    }
}

fn load_logo(
    dir: &Path,
    logo: LogoRef,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> PassResult<Option<PreparedImage>> {
    let png = dir.join(format!("{}.png", logo.file_stem()));
    if png.is_file() {
        let bytes = std::fs::read(&png)
            .with_context(|| format!("read logo '{}'", png.display()))?;
        let img = decode_image(&bytes)
            .map_err(|e| PassError::validation(format!("logo '{}': {e}", png.display())))?;
        return Ok(Some(img));
    }

    let svg = dir.join(format!("{}.svg", logo.file_stem()));
    if svg.is_file() {
        let bytes = std::fs::read(&svg)
            .with_context(|| format!("read logo '{}'", svg.display()))?;
        let opts = usvg::Options {
            resources_dir: Some(dir.to_path_buf()),
            fontdb: Arc::clone(fontdb),
            ..Default::default()
        };
        let tree = parse_svg(&bytes, &opts)
            .map_err(|e| PassError::validation(format!("logo '{}': {e}", svg.display())))?;
        return rasterize_svg_to_height(&tree, LOGO_RASTER_HEIGHT).map(Some);
    }

    Ok(None)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
