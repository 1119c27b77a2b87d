use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use super::*;
use crate::assets::store::PassAssets;
use crate::capture::snapshot::{CapturedImage, SnapshotCapability};
use crate::derive::identity::{DEFAULT_DATE_FORMAT, PassIdentity};
use crate::export::delivery::{InMemoryTarget, ManualSaveDocument};
use crate::export::engine::FixedEngine;
use crate::form::fields::PassFields;
use crate::foundation::core::FixedClock;
use crate::render::layout::project;

/// Returns a 2x2 opaque image, or fails while `fail` is set.
#[derive(Default)]
struct TinyCapture {
    fail: AtomicBool,
}

impl SnapshotCapability for TinyCapture {
    fn capture(&self, _region: &PassRegion, _scale: f32) -> PassResult<CapturedImage> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PassError::capture("canvas unavailable"));
        }
        Ok(CapturedImage {
            width: 2,
            height: 2,
            data: vec![255; 16],
            premultiplied: true,
        })
    }
}

struct BrokenTarget;

impl DeliveryTarget for BrokenTarget {
    fn download(&mut self, _filename: &str, _png: &[u8]) -> PassResult<()> {
        Err(PassError::delivery("blocked"))
    }

    fn open_document(&mut self, _doc: &ManualSaveDocument) -> PassResult<()> {
        Err(PassError::delivery("blocked"))
    }
}

fn snapshot() -> PassSnapshot {
    PassSnapshot::new(
        PassFields {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            ..PassFields::default()
        },
        PassIdentity {
            id: "CKABC123".into(),
            issued_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        },
    )
}

fn region() -> PassRegion {
    PassRegion::new(
        &project(&snapshot(), DEFAULT_DATE_FORMAT).unwrap(),
        &PassAssets::empty(),
    )
}

fn session(engine: EngineKind, capture: Arc<TinyCapture>) -> ExportSession {
    let clock = FixedClock {
        today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        epoch_millis: 1_700_000_000_000,
    };
    let pipeline = ExportPipeline::new(capture, Arc::new(clock));
    ExportSession::new(pipeline, &FixedEngine(engine))
}

#[tokio::test]
async fn export_enters_review_then_download_returns_to_idle() {
    let s = session(EngineKind::Standard, Arc::default());
    assert_eq!(s.export_button_label(), EXPORT_LABEL);

    let outcome = s.export(Some(region()), snapshot()).await;
    let artifact = match outcome {
        ExportOutcome::Review(artifact) => artifact,
        other => panic!("expected review, got {other:?}"),
    };
    assert_eq!(artifact.suggested_filename, "Jane-Doe-1700000000000.png");
    assert!(!s.is_exporting());
    assert_eq!(s.pending_artifact(), Some(artifact.clone()));
    assert_eq!(s.delivery_action_label(), "Download");

    let mut target = InMemoryTarget::new();
    let receipt = s.deliver(&mut target).unwrap();
    assert_eq!(
        receipt,
        DeliveryReceipt::Downloaded {
            filename: artifact.suggested_filename.clone()
        }
    );
    assert_eq!(target.downloads.len(), 1);
    assert_eq!(target.downloads[0].1, artifact.png.to_vec());
    assert!(s.pending_artifact().is_none());
}

#[tokio::test]
async fn restricted_engine_opens_manual_save_document() {
    let s = session(EngineKind::Restricted, Arc::default());
    assert_eq!(s.advisory_banner(), Some(DEFAULT_ADVISORY));
    assert_eq!(s.delivery_action_label(), "Open in New Window");

    let outcome = s.export(Some(region()), snapshot()).await;
    assert!(matches!(outcome, ExportOutcome::Review(_)));

    let mut target = InMemoryTarget::new();
    let receipt = s.deliver(&mut target).unwrap();
    assert!(matches!(receipt, DeliveryReceipt::OpenedDocument { .. }));
    assert!(target.downloads.is_empty());
    assert_eq!(target.documents.len(), 1);
    assert!(target.documents[0].html.contains("data:image/png;base64,"));
}

#[test]
fn standard_engine_has_no_banner() {
    let s = session(EngineKind::Standard, Arc::default()).with_advisory("custom");
    assert_eq!(s.advisory_banner(), None);

    let s = session(EngineKind::Restricted, Arc::default()).with_advisory("custom");
    assert_eq!(s.advisory_banner(), Some("custom"));
}

#[tokio::test]
async fn missing_region_sets_notice_and_allows_retry() {
    let s = session(EngineKind::Standard, Arc::default());

    let outcome = s.export(None, snapshot()).await;
    let notice = match outcome {
        ExportOutcome::Failed(notice) => notice,
        other => panic!("expected failure, got {other:?}"),
    };
    assert_eq!(notice.kind, NoticeKind::CaptureFailed);
    assert_eq!(notice.message, CAPTURE_FAILED_MESSAGE);
    assert_eq!(s.notice(), Some(notice));
    assert!(!s.is_exporting());
    assert!(s.pending_artifact().is_none());

    s.dismiss_notice();
    assert!(s.notice().is_none());

    let outcome = s.export(Some(region()), snapshot()).await;
    assert!(matches!(outcome, ExportOutcome::Review(_)));
}

#[tokio::test]
async fn capture_failure_then_success_clears_notice() {
    let capture = Arc::new(TinyCapture::default());
    capture.fail.store(true, Ordering::SeqCst);
    let s = session(EngineKind::Standard, Arc::clone(&capture));

    assert!(matches!(
        s.export(Some(region()), snapshot()).await,
        ExportOutcome::Failed(_)
    ));
    assert!(s.notice().is_some());

    capture.fail.store(false, Ordering::SeqCst);
    assert!(matches!(
        s.export(Some(region()), snapshot()).await,
        ExportOutcome::Review(_)
    ));
    assert!(s.notice().is_none());
}

#[test]
fn deliver_without_review_is_rejected() {
    let s = session(EngineKind::Standard, Arc::default());
    let err = s.deliver(&mut InMemoryTarget::new()).unwrap_err();
    assert!(matches!(err, PassError::Validation(_)));
}

#[tokio::test]
async fn failed_delivery_keeps_artifact_for_retry() {
    let s = session(EngineKind::Standard, Arc::default());
    s.export(Some(region()), snapshot()).await;

    let err = s.deliver(&mut BrokenTarget).unwrap_err();
    assert!(err.is_delivery());
    assert_eq!(s.notice().map(|n| n.kind), Some(NoticeKind::DeliveryFailed));
    assert!(s.pending_artifact().is_some());

    s.deliver(&mut InMemoryTarget::new()).unwrap();
    assert!(s.notice().is_none());
    assert!(s.pending_artifact().is_none());
}

#[tokio::test]
async fn dismissing_review_discards_artifact() {
    let s = session(EngineKind::Standard, Arc::default());
    s.export(Some(region()), snapshot()).await;
    assert!(s.pending_artifact().is_some());

    s.dismiss_review();
    assert!(s.pending_artifact().is_none());
    assert!(s.deliver(&mut InMemoryTarget::new()).is_err());
}

#[tokio::test]
async fn dropped_export_resets_in_flight_flag() {
    let s = session(EngineKind::Standard, Arc::default());
    {
        let fut = s.export(Some(region()), snapshot());
        let mut fut = std::pin::pin!(fut);
        // Poll once so the session enters the capturing phase, then drop.
        let polled = futures_poll_once(fut.as_mut()).await;
        if polled {
            return;
        }
        assert!(s.is_exporting());
        assert_eq!(s.export_button_label(), EXPORT_BUSY_LABEL);
    }
    assert!(!s.is_exporting());
}

async fn futures_poll_once<F: std::future::Future>(fut: std::pin::Pin<&mut F>) -> bool {
    let mut fut = Some(fut);
    std::future::poll_fn(move |cx| {
        let ready = fut
            .take()
            .map(|f| f.poll(cx).is_ready())
            .unwrap_or(false);
        std::task::Poll::Ready(ready)
    })
    .await
}
