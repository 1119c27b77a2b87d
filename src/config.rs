use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::derive::identity::{DEFAULT_DATE_FORMAT, validate_date_format};
use crate::export::pipeline::DEFAULT_CAPTURE_SCALE;
use crate::foundation::error::{PassError, PassResult};
use crate::session::export_session::DEFAULT_ADVISORY;

/// Largest accepted capture scale.
pub const MAX_CAPTURE_SCALE: f32 = 8.0;

/// Operator-facing settings, usually read from a JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassConfig {
    /// Device pixels per logical pixel for exported PNGs.
    pub capture_scale: f32,
    /// `chrono` strftime pattern for the expiry date.
    pub date_format: String,
    /// Directory holding `essentials-logo`, `premium-logo` and `deluxe-logo` (`.png` or `.svg`).
    pub assets_dir: Option<PathBuf>,
    /// Banner shown on engines that cannot trigger downloads.
    pub advisory_text: String,
    /// Load installed system fonts for card text.
    pub load_system_fonts: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            capture_scale: DEFAULT_CAPTURE_SCALE,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            assets_dir: None,
            advisory_text: DEFAULT_ADVISORY.to_string(),
            load_system_fonts: true,
        }
    }
}

impl PassConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PassResult<Self> {
        let cfg: PassConfig = serde_json::from_reader(r)
            .map_err(|e| PassError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON file on disk.
    ///
    /// A relative `assets_dir` is resolved against the config file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> PassResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PassError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let (Some(dir), Some(parent)) = (cfg.assets_dir.as_ref(), path.parent())
            && dir.is_relative()
        {
            cfg.assets_dir = Some(parent.join(dir));
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> PassResult<()> {
        if !self.capture_scale.is_finite()
            || self.capture_scale <= 0.0
            || self.capture_scale > MAX_CAPTURE_SCALE
        {
            return Err(PassError::validation(format!(
                "capture_scale must be in (0, {MAX_CAPTURE_SCALE}], got {}",
                self.capture_scale
            )));
        }
        validate_date_format(&self.date_format)?;
        if self.advisory_text.trim().is_empty() {
            return Err(PassError::validation("advisory_text must not be empty"));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> PassResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PassError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
