use std::fmt::Write as _;

use chrono::{Months, NaiveDate};
use rand::Rng;

use crate::form::fields::{MembershipLength, leading_month_count};
use crate::foundation::error::{PassError, PassResult};

/// Prefix of every pass identifier.
pub const ID_PREFIX: &str = "CK";
/// Number of random characters after [`ID_PREFIX`].
pub const ID_RANDOM_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Default expiry date format (`2/15/2024`).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Identifier and issue date pinned to one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassIdentity {
    pub id: String,
    pub issued_on: NaiveDate,
}

impl PassIdentity {
    /// Fresh identifier issued on `issued_on`.
    pub fn generate<R: Rng>(issued_on: NaiveDate, rng: &mut R) -> Self {
        Self {
            id: generate_identifier(rng),
            issued_on,
        }
    }

    pub fn expiry(&self, length: MembershipLength) -> NaiveDate {
        compute_expiry(self.issued_on, length)
    }
}

/// `"CK"` followed by six upper-cased base-36 characters.
///
/// Not collision resistant; the identifier is decorative.
pub fn generate_identifier<R: Rng>(rng: &mut R) -> String {
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_RANDOM_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_RANDOM_LEN {
        let c = BASE36[rng.random_range(0..BASE36.len())];
        id.push(char::from(c).to_ascii_uppercase());
    }
    id
}

/// [`generate_identifier`] with the thread-local RNG.
pub fn generate_identifier_default() -> String {
    generate_identifier(&mut rand::rng())
}

/// `now` advanced by the membership length in calendar months.
///
/// Day-of-month clamps to the last day of shorter months (Jan 31 + 1 month = Feb 28/29).
pub fn compute_expiry(now: NaiveDate, length: MembershipLength) -> NaiveDate {
    add_months(now, length.months())
}

/// Label-driven form of [`compute_expiry`]: reads the leading integer of `"6 Months"` etc.
pub fn compute_expiry_from_label(now: NaiveDate, label: &str) -> PassResult<NaiveDate> {
    let months = leading_month_count(label).ok_or_else(|| {
        PassError::validation(format!("duration label \"{label}\" has no month count"))
    })?;
    Ok(add_months(now, months))
}

fn add_months(now: NaiveDate, months: u32) -> NaiveDate {
    now.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Check that a `chrono` format string has no invalid specifiers.
pub fn validate_date_format(fmt: &str) -> PassResult<()> {
    use chrono::format::{Item, StrftimeItems};

    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(PassError::validation(format!("invalid date format \"{fmt}\"")));
    }
    Ok(())
}

/// Render an expiry date with a `chrono` format string.
pub fn format_expiry(date: NaiveDate, fmt: &str) -> PassResult<String> {
    validate_date_format(fmt)?;
    let mut out = String::new();
    write!(out, "{}", date.format(fmt))
        .map_err(|_| PassError::validation(format!("format date with \"{fmt}\"")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/derive/identity.rs"]
mod tests;
