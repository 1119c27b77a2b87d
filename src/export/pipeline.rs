use std::sync::Arc;

use crate::capture::snapshot::{ResvgSnapshot, SnapshotCapability};
use crate::export::artifact::{ExportArtifact, encode_png, suggested_filename};
use crate::form::state::PassSnapshot;
use crate::foundation::core::{Clock, SystemClock};
use crate::foundation::error::{PassError, PassResult};
use crate::render::region::PassRegion;

/// Device pixels per logical pixel used for exports by default.
pub const DEFAULT_CAPTURE_SCALE: f32 = 2.0;

/// Region -> PNG artifact.
///
/// The capture and PNG encoding run on tokio's blocking pool; awaiting an export never stalls the
/// calling task's executor thread.
#[derive(Clone)]
pub struct ExportPipeline {
    capture: Arc<dyn SnapshotCapability>,
    clock: Arc<dyn Clock>,
    scale: f32,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ResvgSnapshot), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl ExportPipeline {
    pub fn new(capture: Arc<dyn SnapshotCapability>, clock: Arc<dyn Clock>) -> Self {
        Self {
            capture,
            clock,
            scale: DEFAULT_CAPTURE_SCALE,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Capture `region` and package it as an artifact named after `snapshot`'s fields.
    ///
    /// An absent region is a [`PassError::Capture`], as is any failure of the capture step.
    #[tracing::instrument(skip_all, fields(pass_id = %snapshot.identity().id, scale = self.scale))]
    pub async fn export_pass(
        &self,
        region: Option<PassRegion>,
        snapshot: &PassSnapshot,
    ) -> PassResult<ExportArtifact> {
        let region = region.ok_or_else(|| PassError::capture("pass region is not available"))?;
        let capture = Arc::clone(&self.capture);
        let scale = self.scale;

        let (png, width, height) = tokio::task::spawn_blocking(move || {
            let img = capture.capture(&region, scale)?;
            let png = encode_png(&img)?;
            Ok::<_, PassError>((png, img.width, img.height))
        })
        .await
        .map_err(|e| PassError::capture(format!("capture task failed: {e}")))?
        .map_err(into_capture)?;

        let filename = suggested_filename(snapshot.fields(), self.clock.epoch_millis());
        tracing::info!(%filename, width, height, bytes = png.len(), "pass exported");
        Ok(ExportArtifact::new(png, width, height, filename))
    }
}

fn into_capture(err: PassError) -> PassError {
    match err {
        PassError::Capture(_) => err,
        other => PassError::capture(other.to_string()),
    }
}
