use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;

use crate::derive::identity::PassIdentity;
use crate::form::fields::{MembershipLength, MembershipType, PassFields, ProfileImage};
use crate::foundation::core::Clock;

/// One input event from the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    MembershipType(MembershipType),
    MembershipLength(MembershipLength),
    ParkingBay(String),
    ProfileImage(ProfileImage),
    ClearProfileImage,
}

/// Immutable view of the form at one point in time.
///
/// Cheap to clone; later edits to the [`FormState`] never change an existing snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassSnapshot {
    fields: Arc<PassFields>,
    identity: PassIdentity,
}

impl PassSnapshot {
    pub fn new(fields: PassFields, identity: PassIdentity) -> Self {
        Self {
            fields: Arc::new(fields),
            identity,
        }
    }

    pub fn fields(&self) -> &PassFields {
        &self.fields
    }

    pub fn identity(&self) -> &PassIdentity {
        &self.identity
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.identity.expiry(self.fields.membership_length)
    }
}

/// Single-writer store for the pass form.
///
/// The identity is generated when the store is created (or reset) and stays pinned for the
/// lifetime of the pass, so preview and export always agree on the ID.
#[derive(Debug)]
pub struct FormState {
    fields: Arc<PassFields>,
    identity: PassIdentity,
}

impl FormState {
    pub fn new<R: Rng>(issued_on: NaiveDate, rng: &mut R) -> Self {
        Self {
            fields: Arc::new(PassFields::default()),
            identity: PassIdentity::generate(issued_on, rng),
        }
    }

    /// New form issued today according to `clock`.
    pub fn start(clock: &dyn Clock) -> Self {
        Self::new(clock.today(), &mut rand::rng())
    }

    pub fn fields(&self) -> &PassFields {
        &self.fields
    }

    pub fn identity(&self) -> &PassIdentity {
        &self.identity
    }

    pub fn snapshot(&self) -> PassSnapshot {
        PassSnapshot {
            fields: Arc::clone(&self.fields),
            identity: self.identity.clone(),
        }
    }

    /// Apply one input event and return the resulting snapshot.
    pub fn apply(&mut self, update: FieldUpdate) -> PassSnapshot {
        tracing::trace!(?update, "form update");
        let fields = Arc::make_mut(&mut self.fields);
        match update {
            FieldUpdate::FirstName(v) => fields.first_name = v,
            FieldUpdate::LastName(v) => fields.last_name = v,
            FieldUpdate::MembershipType(v) => fields.membership_type = v,
            FieldUpdate::MembershipLength(v) => fields.membership_length = v,
            FieldUpdate::ParkingBay(v) => fields.parking_bay = v,
            FieldUpdate::ProfileImage(v) => fields.profile_image = Some(v),
            FieldUpdate::ClearProfileImage => fields.profile_image = None,
        }
        self.snapshot()
    }

    /// Attach an uploaded photo from raw file bytes.
    pub fn upload_profile_image(&mut self, mime: &str, bytes: &[u8]) -> PassSnapshot {
        self.apply(FieldUpdate::ProfileImage(ProfileImage::from_bytes(mime, bytes)))
    }

    /// The bay input is only offered for the Parking tier.
    pub fn shows_parking_bay_input(&self) -> bool {
        self.fields.membership_type == MembershipType::Parking
    }

    /// Discard all fields and start a new pass with a new identity.
    pub fn reset<R: Rng>(&mut self, issued_on: NaiveDate, rng: &mut R) {
        *self = Self::new(issued_on, rng);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/state.rs"]
mod tests;
