//! ckpass renders CK Club membership access passes and exports them as PNG images.
//!
//! The flow is snapshot-oriented:
//!
//! - Edit a [`FormState`] with [`FieldUpdate`]s and take an immutable [`PassSnapshot`]
//! - Project the snapshot into a [`PassLayout`] and a capturable [`PassRegion`]
//! - Run an [`ExportSession`]: capture into review, then deliver to a [`DeliveryTarget`] the way
//!   the detected [`EngineKind`] supports
#![forbid(unsafe_code)]

mod assets;
mod capture;
mod config;
mod derive;
mod export;
mod form;
mod foundation;
mod render;
mod session;

pub use crate::foundation::core::{Circle, Clock, FixedClock, Point, Rect, Rgb8, Size, SystemClock};
pub use crate::foundation::error::{PassError, PassResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::store::PassAssets;
pub use crate::capture::snapshot::{CapturedImage, ResvgSnapshot, SnapshotCapability};
pub use crate::config::{MAX_CAPTURE_SCALE, PassConfig};
pub use crate::derive::identity::{
    DEFAULT_DATE_FORMAT, ID_PREFIX, ID_RANDOM_LEN, PassIdentity, compute_expiry,
    compute_expiry_from_label, format_expiry, generate_identifier, generate_identifier_default,
    validate_date_format,
};
pub use crate::derive::presentation::{
    LogoRef, MembershipPresentation, presentation_for, presentation_for_label,
};
pub use crate::export::artifact::{
    ExportArtifact, PNG_DATA_URI_PREFIX, encode_png, png_data_uri, suggested_filename,
};
pub use crate::export::delivery::{
    DeliveryPlan, DeliveryReceipt, DeliveryTarget, DirectoryTarget, InMemoryTarget,
    MANUAL_SAVE_TITLE, ManualSaveDocument,
};
pub use crate::export::engine::{
    EngineDetector, EngineKind, FixedEngine, UserAgentDetector, classify_user_agent,
};
pub use crate::export::pipeline::{DEFAULT_CAPTURE_SCALE, ExportPipeline};
pub use crate::form::fields::{MembershipLength, MembershipType, PassFields, ProfileImage};
pub use crate::form::state::{FieldUpdate, FormState, PassSnapshot};
pub use crate::render::layout::{
    BlockKind, CARD_HEIGHT, CARD_WIDTH, FOOTER_TAGLINE, HeaderBand, InfoBlock, PassLayout,
    PhotoSlot, TextLine, display_name, project,
};
pub use crate::render::region::{LogoOverlay, PassRegion, PhotoOverlay};
pub use crate::render::svg::{escape_xml, write_svg};
pub use crate::session::export_session::{
    DEFAULT_ADVISORY, EXPORT_BUSY_LABEL, EXPORT_LABEL, ExportOutcome, ExportSession, NoticeKind,
    UserNotice,
};
