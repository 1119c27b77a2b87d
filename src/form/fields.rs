use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::{PassError, PassResult};

/// Membership tier selected on the form.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum MembershipType {
    #[default]
    Essential,
    Premium,
    Deluxe,
    Parking,
}

impl MembershipType {
    /// All tiers in selector order.
    pub const ALL: [Self; 4] = [Self::Essential, Self::Premium, Self::Deluxe, Self::Parking];

    /// Label shown in the selector and on the tier block.
    pub fn label(self) -> &'static str {
        match self {
            Self::Essential => "Essential Membership",
            Self::Premium => "Premium Membership",
            Self::Deluxe => "Deluxe Membership",
            Self::Parking => "Parking Membership",
        }
    }

    /// Lenient parse from a selector label or a bare tier word.
    ///
    /// Never fails: anything unrecognized is treated as `Essential`.
    pub fn from_label(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        let word = s.strip_suffix("membership").unwrap_or(&s).trim();
        match word {
            "premium" => Self::Premium,
            "deluxe" => Self::Deluxe,
            "parking" => Self::Parking,
            _ => Self::Essential,
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Membership duration. The option set is fixed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum MembershipLength {
    #[default]
    OneMonth,
    SixMonths,
    TwelveMonths,
}

impl MembershipLength {
    /// All durations in selector order.
    pub const ALL: [Self; 3] = [Self::OneMonth, Self::SixMonths, Self::TwelveMonths];

    pub fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneMonth => "1 Month",
            Self::SixMonths => "6 Months",
            Self::TwelveMonths => "12 Months",
        }
    }

    pub fn from_months(months: u32) -> PassResult<Self> {
        match months {
            1 => Ok(Self::OneMonth),
            6 => Ok(Self::SixMonths),
            12 => Ok(Self::TwelveMonths),
            other => Err(PassError::validation(format!(
                "membership length must be 1, 6 or 12 months (got {other})"
            ))),
        }
    }

    /// Parse from a selector label such as `"6 Months"` (or a bare `"6"`).
    pub fn from_label(s: &str) -> PassResult<Self> {
        let months = leading_month_count(s).ok_or_else(|| {
            PassError::validation(format!("membership length label \"{s}\" has no month count"))
        })?;
        Self::from_months(months)
    }
}

impl std::fmt::Display for MembershipLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Leading integer token of a duration label (`"12 Months"` -> `12`).
pub(crate) fn leading_month_count(label: &str) -> Option<u32> {
    let token = label.split_whitespace().next()?;
    let digits_end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(token.len(), |(i, _)| i);
    token[..digits_end].parse().ok()
}

/// Uploaded profile photo, held as a `data:` URI.
///
/// The payload is not inspected when the photo is attached; decoding happens at capture time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
    data_uri: Arc<str>,
}

impl ProfileImage {
    /// Encode raw file bytes as a base64 data URI with the given MIME type.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            data_uri: Arc::from(format!("data:{mime};base64,{b64}")),
        }
    }

    /// Wrap an existing data URI verbatim.
    pub fn from_data_uri(uri: impl Into<String>) -> Self {
        Self {
            data_uri: Arc::from(uri.into()),
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// MIME type declared by the URI, if any.
    pub fn mime(&self) -> Option<&str> {
        let rest = self.data_uri.strip_prefix("data:")?;
        let header = rest.split(',').next()?;
        let mime = header.split(';').next()?;
        (!mime.is_empty()).then_some(mime)
    }

    /// Decode the URI payload back into file bytes.
    pub fn decode_bytes(&self) -> PassResult<Vec<u8>> {
        let rest = self
            .data_uri
            .strip_prefix("data:")
            .ok_or_else(|| PassError::capture("profile image is not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PassError::capture("profile image data URI has no payload"))?;
        if header.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| PassError::capture(format!("profile image base64 payload: {e}")))
        } else {
            Ok(payload.as_bytes().to_vec())
        }
    }
}

/// Operator-entered pass fields.
///
/// Empty strings are valid everywhere; the renderer substitutes placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassFields {
    pub first_name: String,
    pub last_name: String,
    pub membership_type: MembershipType,
    pub membership_length: MembershipLength,
    /// Only meaningful for [`MembershipType::Parking`].
    pub parking_bay: String,
    pub profile_image: Option<ProfileImage>,
}

impl PassFields {
    /// Whether the parking bay block belongs on the pass.
    pub fn shows_parking_bay(&self) -> bool {
        self.membership_type == MembershipType::Parking && !self.parking_bay.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/fields.rs"]
mod tests;
