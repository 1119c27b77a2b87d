use chrono::NaiveDate;

pub use kurbo::{Circle, Point, Rect, Size};

/// Opaque sRGB color (straight, 8 bits per channel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::from_hex(0xFFFFFF);
    pub const BLACK: Self = Self::from_hex(0x000000);

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    /// CSS/SVG hex notation, upper-case (`#RRGGBB`).
    pub fn to_css(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Source of "now" for identity dates and export filenames.
///
/// Injected so that expiry dates and filenames are reproducible in tests.
pub trait Clock: Send + Sync {
    /// Today's calendar date in the operator's local time zone.
    fn today(&self) -> NaiveDate;
    /// Milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn epoch_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub epoch_millis: i64,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
