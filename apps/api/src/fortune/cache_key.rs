//! Daily cache key derivation.
//!
//! The key embeds the caller's calendar day, so a stored fortune stops
//! matching at local midnight without any eviction.

use chrono::{Local, NaiveDate};

use crate::fortune::models::{BloodType, Mode, ValidatedRequest};

/// Namespace prefix shared with the browser's `localStorage` entries.
pub const KEY_PREFIX: &str = "fortune";
/// Field separator. Never appears in a validated birth date, blood type, or mode tag.
pub const KEY_DELIMITER: char = ':';

/// Builds `fortune:{birthDate}:{bloodType}:{today}:{mode}`.
pub fn cache_key(birth_date: &str, blood_type: BloodType, mode: Mode, today: NaiveDate) -> String {
    format!(
        "{KEY_PREFIX}{d}{birth_date}{d}{blood_type}{d}{today}{d}{mode}",
        d = KEY_DELIMITER,
        today = today.format("%Y-%m-%d"),
    )
}

/// Key for an already validated request.
pub fn request_key(req: &ValidatedRequest, today: NaiveDate) -> String {
    cache_key(&req.birth_date, req.blood_type, req.mode, today)
}

/// The caller's current calendar day on the local clock.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
