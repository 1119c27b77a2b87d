use crate::derive::identity::format_expiry;
use crate::derive::presentation::{LogoRef, MembershipPresentation, presentation_for};
use crate::form::fields::{PassFields, ProfileImage};
use crate::form::state::PassSnapshot;
use crate::foundation::core::{Circle, Point, Rect, Rgb8, Size};
use crate::foundation::error::PassResult;

// Card geometry, logical pixels.
pub const CARD_WIDTH: f64 = 448.0;
pub const CARD_HEIGHT: f64 = 672.0;
const CORNER_RADIUS: f64 = 12.0;
const HEADER_HEIGHT: f64 = 72.0;
const LOGO_HEIGHT: f64 = 48.0;
const LOGO_MAX_WIDTH: f64 = 150.0;
const FOOTER_HEIGHT: f64 = 56.0;
const BODY_PADDING: f64 = 24.0;
const PHOTO_DIAMETER: f64 = 176.0;
const PHOTO_RING: f64 = 4.0;
const PHOTO_MARGIN: f64 = 24.0;
const NAME_SIZE: f64 = 30.0;
const NAME_LINE: f64 = 36.0;
const NAME_MARGIN: f64 = 16.0;
const BLOCK_HEIGHT: f64 = 48.0;
const BLOCK_GAP: f64 = 8.0;
const TIER_TEXT_SIZE: f64 = 20.0;
const INFO_TEXT_SIZE: f64 = 16.0;
const FOOTER_MARGIN: f64 = 24.0;
const FOOTER_PADDING: f64 = 16.0;
const SMALL_TEXT_SIZE: f64 = 14.0;
const SMALL_LINE: f64 = 20.0;
const SMALL_GAP: f64 = 4.0;
pub(crate) const GRID_STEP: f64 = 40.0;

const BODY_FILL: Rgb8 = Rgb8::from_hex(0x3C3B39);
const RING_COLOR: Rgb8 = Rgb8::from_hex(0x4B5563);
const MUTED_TEXT: Rgb8 = Rgb8::from_hex(0xD1D5DB);

pub const FOOTER_TAGLINE: &str = "CK Club Access Pass";

/// A single centered line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Horizontal center and vertical middle of the line box.
    pub center: Point,
    pub size: f64,
    pub color: Rgb8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Tier,
    ParkingBay,
    Duration,
}

/// One of the colored label bars under the name.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoBlock {
    pub kind: BlockKind,
    pub rect: Rect,
    pub fill: Rgb8,
    pub label: TextLine,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderBand {
    pub rect: Rect,
    pub fill: Rgb8,
    pub logo: LogoRef,
    /// Box the logo is fitted into (aspect preserved, centered).
    pub logo_slot: Rect,
    /// Drawn instead of the logo when no logo asset is loaded.
    pub wordmark: TextLine,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoSlot {
    /// Outer edge of the ring.
    pub circle: Circle,
    pub ring_width: f64,
    pub ring_color: Rgb8,
    pub image: Option<ProfileImage>,
}

impl PhotoSlot {
    /// Area the photo itself is clipped to.
    pub fn inner_circle(&self) -> Circle {
        Circle::new(self.circle.center, self.circle.radius - self.ring_width)
    }
}

/// Fully resolved geometry and content of one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PassLayout {
    pub size: Size,
    pub corner_radius: f64,
    pub presentation: MembershipPresentation,
    pub body: Rect,
    pub body_fill: Rgb8,
    pub header: HeaderBand,
    pub photo: PhotoSlot,
    pub name: TextLine,
    pub blocks: Vec<InfoBlock>,
    /// Horizontal rule above the ID line: `(y, x0, x1)`.
    pub divider: (f64, f64, f64),
    pub divider_color: Rgb8,
    pub id_line: TextLine,
    pub expiry_line: TextLine,
    pub footer: Rect,
    pub footer_text: TextLine,
}

impl PassLayout {
    pub fn block(&self, kind: BlockKind) -> Option<&InfoBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    pub fn has_parking_bay_block(&self) -> bool {
        self.block(BlockKind::ParkingBay).is_some()
    }
}

/// Upper-cased full name with `First`/`Last` placeholders for empty parts.
pub fn display_name(fields: &PassFields) -> String {
    let first = non_empty_or(&fields.first_name, "First");
    let last = non_empty_or(&fields.last_name, "Last");
    format!("{first} {last}").to_uppercase()
}

fn non_empty_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.is_empty() { fallback } else { s }
}

/// Project a form snapshot onto the card.
///
/// Pure: the same snapshot and date format always give the same layout.
pub fn project(snapshot: &PassSnapshot, date_format: &str) -> PassResult<PassLayout> {
    let fields = snapshot.fields();
    let presentation = presentation_for(fields.membership_type);
    let expiry = format_expiry(snapshot.expiry_date(), date_format)?;

    let header_rect = Rect::new(0.0, 0.0, CARD_WIDTH, HEADER_HEIGHT);
    let footer = Rect::new(0.0, CARD_HEIGHT - FOOTER_HEIGHT, CARD_WIDTH, CARD_HEIGHT);
    let body = Rect::new(0.0, HEADER_HEIGHT, CARD_WIDTH, footer.y0);
    let cx = CARD_WIDTH / 2.0;

    let header = HeaderBand {
        rect: header_rect,
        fill: presentation.header_background,
        logo: presentation.logo,
        logo_slot: Rect::from_center_size(header_rect.center(), (LOGO_MAX_WIDTH, LOGO_HEIGHT)),
        wordmark: TextLine {
            text: presentation.logo.wordmark().to_string(),
            center: header_rect.center(),
            size: TIER_TEXT_SIZE,
            color: presentation.header_text,
        },
    };

    let mut block_rows = vec![(BlockKind::Tier, fields.membership_type.label().to_string())];
    if fields.shows_parking_bay() {
        block_rows.push((BlockKind::ParkingBay, format!("Bay: {}", fields.parking_bay)));
    }
    block_rows.push((
        BlockKind::Duration,
        fields.membership_length.label().to_string(),
    ));

    let n = block_rows.len() as f64;
    let blocks_height = n * BLOCK_HEIGHT + (n - 1.0) * BLOCK_GAP;
    let content_height = PHOTO_DIAMETER
        + PHOTO_MARGIN
        + NAME_LINE
        + NAME_MARGIN
        + blocks_height
        + FOOTER_MARGIN
        + 1.0
        + FOOTER_PADDING
        + SMALL_LINE
        + SMALL_GAP
        + SMALL_LINE;
    let available = body.height() - 2.0 * BODY_PADDING;
    let mut y = body.y0 + BODY_PADDING + ((available - content_height) / 2.0).max(0.0);

    let photo = PhotoSlot {
        circle: Circle::new((cx, y + PHOTO_DIAMETER / 2.0), PHOTO_DIAMETER / 2.0),
        ring_width: PHOTO_RING,
        ring_color: RING_COLOR,
        image: fields.profile_image.clone(),
    };
    y += PHOTO_DIAMETER + PHOTO_MARGIN;

    let name = TextLine {
        text: display_name(fields),
        center: Point::new(cx, y + NAME_LINE / 2.0),
        size: NAME_SIZE,
        color: Rgb8::WHITE,
    };
    y += NAME_LINE + NAME_MARGIN;

    let block_x0 = body.x0 + BODY_PADDING;
    let block_x1 = body.x1 - BODY_PADDING;
    let mut blocks = Vec::with_capacity(block_rows.len());
    for (i, (kind, text)) in block_rows.into_iter().enumerate() {
        if i > 0 {
            y += BLOCK_GAP;
        }
        let rect = Rect::new(block_x0, y, block_x1, y + BLOCK_HEIGHT);
        let size = if kind == BlockKind::Tier {
            TIER_TEXT_SIZE
        } else {
            INFO_TEXT_SIZE
        };
        blocks.push(InfoBlock {
            kind,
            rect,
            fill: presentation.block_background,
            label: TextLine {
                text,
                center: rect.center(),
                size,
                color: presentation.block_text,
            },
        });
        y += BLOCK_HEIGHT;
    }

    y += FOOTER_MARGIN;
    let divider = (y, block_x0, block_x1);
    y += 1.0 + FOOTER_PADDING;
    let id_line = TextLine {
        text: format!("ID: {}", snapshot.identity().id),
        center: Point::new(cx, y + SMALL_LINE / 2.0),
        size: SMALL_TEXT_SIZE,
        color: MUTED_TEXT,
    };
    y += SMALL_LINE + SMALL_GAP;
    let expiry_line = TextLine {
        text: format!("Valid until: {expiry}"),
        center: Point::new(cx, y + SMALL_LINE / 2.0),
        size: SMALL_TEXT_SIZE,
        color: MUTED_TEXT,
    };

    Ok(PassLayout {
        size: Size::new(CARD_WIDTH, CARD_HEIGHT),
        corner_radius: CORNER_RADIUS,
        presentation,
        body,
        body_fill: BODY_FILL,
        header,
        photo,
        name,
        blocks,
        divider,
        divider_color: RING_COLOR,
        id_line,
        expiry_line,
        footer,
        footer_text: TextLine {
            text: FOOTER_TAGLINE.to_string(),
            center: footer.center(),
            size: INFO_TEXT_SIZE,
            color: Rgb8::WHITE,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
