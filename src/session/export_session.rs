use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::export::artifact::ExportArtifact;
use crate::export::delivery::{DeliveryPlan, DeliveryReceipt, DeliveryTarget};
use crate::export::engine::{EngineDetector, EngineKind};
use crate::export::pipeline::ExportPipeline;
use crate::form::state::PassSnapshot;
use crate::foundation::error::{PassError, PassResult};
use crate::render::region::PassRegion;

pub const EXPORT_LABEL: &str = "Download Access Pass";
pub const EXPORT_BUSY_LABEL: &str = "Generating...";
pub const DEFAULT_ADVISORY: &str = "Safari detected: your pass will open in a new window. \
Right-click the image and choose \"Save Image As...\" to download it.";

const CAPTURE_FAILED_MESSAGE: &str =
    "There was an error generating your access pass. Please try again.";
const DELIVERY_FAILED_MESSAGE: &str =
    "Your access pass could not be saved. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    CaptureFailed,
    DeliveryFailed,
}

/// Dismissible, non-fatal error message for the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl UserNotice {
    fn capture_failed() -> Self {
        Self {
            kind: NoticeKind::CaptureFailed,
            message: CAPTURE_FAILED_MESSAGE.to_string(),
        }
    }

    fn delivery_failed() -> Self {
        Self {
            kind: NoticeKind::DeliveryFailed,
            message: DELIVERY_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Result of asking the session to export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Capture succeeded; the artifact now awaits an explicit delivery.
    Review(ExportArtifact),
    /// Another export is still capturing; nothing was started.
    Busy,
    /// Capture failed; the notice is also stored on the session.
    Failed(UserNotice),
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Capturing,
    Review(ExportArtifact),
}

#[derive(Debug, Default)]
struct SessionState {
    phase: Phase,
    notice: Option<UserNotice>,
}

/// Two-phase export for one operator session: capture into review, then deliver on request.
///
/// At most one capture runs at a time. Every failure leaves the session ready for another try.
#[derive(Debug)]
pub struct ExportSession {
    pipeline: ExportPipeline,
    engine: EngineKind,
    advisory: String,
    state: Mutex<SessionState>,
}

impl ExportSession {
    /// Create a session; the engine is detected once, here.
    pub fn new(pipeline: ExportPipeline, detector: &dyn EngineDetector) -> Self {
        let engine = detector.detect();
        tracing::info!(?engine, "export session started");
        Self {
            pipeline,
            engine,
            advisory: DEFAULT_ADVISORY.to_string(),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_advisory(mut self, text: impl Into<String>) -> Self {
        self.advisory = text.into();
        self
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Standing banner for restricted engines, shown regardless of export activity.
    pub fn advisory_banner(&self) -> Option<&str> {
        self.engine.is_restricted().then_some(self.advisory.as_str())
    }

    pub fn is_exporting(&self) -> bool {
        matches!(self.lock().phase, Phase::Capturing)
    }

    pub fn export_button_label(&self) -> &'static str {
        if self.is_exporting() {
            EXPORT_BUSY_LABEL
        } else {
            EXPORT_LABEL
        }
    }

    /// Label of the review dialog's delivery button.
    pub fn delivery_action_label(&self) -> &'static str {
        match self.engine {
            EngineKind::Standard => "Download",
            EngineKind::Restricted => "Open in New Window",
        }
    }

    pub fn pending_artifact(&self) -> Option<ExportArtifact> {
        match &self.lock().phase {
            Phase::Review(artifact) => Some(artifact.clone()),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<UserNotice> {
        self.lock().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.lock().notice = None;
    }

    /// Close the review without delivering.
    pub fn dismiss_review(&self) {
        let mut state = self.lock();
        if matches!(state.phase, Phase::Review(_)) {
            state.phase = Phase::Idle;
        }
    }

    /// First phase: capture the region and hold the artifact for review.
    ///
    /// Returns [`ExportOutcome::Busy`] without doing anything while a capture is in flight.
    pub async fn export(
        &self,
        region: Option<PassRegion>,
        snapshot: PassSnapshot,
    ) -> ExportOutcome {
        {
            let mut state = self.lock();
            if matches!(state.phase, Phase::Capturing) {
                tracing::debug!("export already in progress, ignoring request");
                return ExportOutcome::Busy;
            }
            state.phase = Phase::Capturing;
            state.notice = None;
        }

        let mut in_flight = InFlight {
            session: self,
            armed: true,
        };
        let result = self.pipeline.export_pass(region, &snapshot).await;
        in_flight.armed = false;

        let mut state = self.lock();
        match result {
            Ok(artifact) => {
                state.phase = Phase::Review(artifact.clone());
                ExportOutcome::Review(artifact)
            }
            Err(err) => {
                tracing::error!(error = %err, "error generating access pass");
                let notice = UserNotice::capture_failed();
                state.phase = Phase::Idle;
                state.notice = Some(notice.clone());
                ExportOutcome::Failed(notice)
            }
        }
    }

    /// Second phase: deliver the reviewed artifact the way the engine supports.
    ///
    /// On failure the artifact stays in review so delivery can be retried.
    pub fn deliver(&self, target: &mut dyn DeliveryTarget) -> PassResult<DeliveryReceipt> {
        let artifact = self
            .pending_artifact()
            .ok_or_else(|| PassError::validation("no exported pass is awaiting delivery"))?;
        let plan = DeliveryPlan::for_engine(self.engine, &artifact);

        match plan.execute(target) {
            Ok(receipt) => {
                let mut state = self.lock();
                if matches!(state.phase, Phase::Review(_)) {
                    state.phase = Phase::Idle;
                }
                state.notice = None;
                tracing::info!(?receipt, "access pass delivered");
                Ok(receipt)
            }
            Err(err) => {
                tracing::error!(error = %err, "error delivering access pass");
                self.lock().notice = Some(UserNotice::delivery_failed());
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets a capture that never completed (its future was dropped) back to idle.
struct InFlight<'a> {
    session: &'a ExportSession,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.session.lock();
            if matches!(state.phase, Phase::Capturing) {
                state.phase = Phase::Idle;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/export_session.rs"]
mod tests;
