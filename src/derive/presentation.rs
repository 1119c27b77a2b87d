use crate::foundation::core::Rgb8;
use crate::form::fields::MembershipType;

/// Logo asset shown in the pass header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogoRef {
    Essentials,
    Premium,
    Deluxe,
}

impl LogoRef {
    pub const ALL: [Self; 3] = [Self::Essentials, Self::Premium, Self::Deluxe];

    /// File stem looked up under the assets directory (`.png` or `.svg`).
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Essentials => "essentials-logo",
            Self::Premium => "premium-logo",
            Self::Deluxe => "deluxe-logo",
        }
    }

    /// Text drawn in place of the logo when the asset is not available.
    pub fn wordmark(self) -> &'static str {
        match self {
            Self::Essentials => "CK CLUB ESSENTIALS",
            Self::Premium => "CK CLUB PREMIUM",
            Self::Deluxe => "CK CLUB DELUXE",
        }
    }
}

/// Tier-dependent colors and logo for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MembershipPresentation {
    /// Header band fill.
    pub header_background: Rgb8,
    /// Text drawn on the header band (logo wordmark fallback).
    pub header_text: Rgb8,
    /// Fill of the tier / bay / duration blocks.
    pub block_background: Rgb8,
    /// Text on those blocks.
    pub block_text: Rgb8,
    pub logo: LogoRef,
}

const ESSENTIAL: MembershipPresentation = MembershipPresentation {
    header_background: Rgb8::from_hex(0xEF4137),
    header_text: Rgb8::WHITE,
    block_background: Rgb8::from_hex(0xEF4238),
    block_text: Rgb8::WHITE,
    logo: LogoRef::Essentials,
};

const PREMIUM: MembershipPresentation = MembershipPresentation {
    header_background: Rgb8::from_hex(0xE8E4DA),
    header_text: Rgb8::from_hex(0x1F2937),
    block_background: Rgb8::from_hex(0xE8E4DA),
    block_text: Rgb8::from_hex(0x3C3B39),
    logo: LogoRef::Premium,
};

const DELUXE: MembershipPresentation = MembershipPresentation {
    header_background: Rgb8::from_hex(0x3C3B39),
    header_text: Rgb8::WHITE,
    block_background: Rgb8::from_hex(0x8C8884),
    block_text: Rgb8::from_hex(0xE8E4DA),
    logo: LogoRef::Deluxe,
};

// Parking has no logo of its own yet and reuses the Deluxe one.
const PARKING: MembershipPresentation = MembershipPresentation {
    header_background: Rgb8::from_hex(0x8C8884),
    header_text: Rgb8::WHITE,
    block_background: Rgb8::from_hex(0x8C8884),
    block_text: Rgb8::from_hex(0xE8E4DA),
    logo: LogoRef::Deluxe,
};

/// Fixed tier -> presentation lookup.
pub fn presentation_for(tier: MembershipType) -> MembershipPresentation {
    match tier {
        MembershipType::Essential => ESSENTIAL,
        MembershipType::Premium => PREMIUM,
        MembershipType::Deluxe => DELUXE,
        MembershipType::Parking => PARKING,
    }
}

/// Presentation for free-form tier text; unrecognized text gets Essential's.
pub fn presentation_for_label(label: &str) -> MembershipPresentation {
    presentation_for(MembershipType::from_label(label))
}

#[cfg(test)]
#[path = "../../tests/unit/derive/presentation.rs"]
mod tests;
