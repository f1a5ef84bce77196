//! Response parser/validator for provider output.
//!
//! The provider returns free text that usually, but not always, is a bare
//! JSON object. Recovery strategy: take the span from the first `{` to the
//! last `}` and parse that. Validation is all-or-nothing; a partially valid
//! object never leaves this module.

use serde::Deserialize;
use serde_json::Value;

use crate::fortune::error::FortuneError;
use crate::fortune::models::FortuneResult;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 100;

/// Loosely typed mirror of the expected payload. Presence and JSON type are
/// enforced by serde; content rules are checked afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFortune {
    overall: String,
    love: String,
    work: String,
    lucky_item: String,
    lucky_color: String,
    rating: i64,
}

/// Returns the substring from the first `{` to the last `}` inclusive.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Extracts, parses, and validates a fortune from raw provider text.
pub fn parse_fortune(raw: &str) -> Result<FortuneResult, FortuneError> {
    let span = extract_json_span(raw).ok_or_else(|| {
        FortuneError::MalformedResponse("no JSON object found in response".to_string())
    })?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| FortuneError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let fields: RawFortune = serde_json::from_value(value)
        .map_err(|e| FortuneError::SchemaInvalid(e.to_string()))?;

    validate(fields)
}

fn validate(raw: RawFortune) -> Result<FortuneResult, FortuneError> {
    let text_fields = [
        ("overall", &raw.overall),
        ("love", &raw.love),
        ("work", &raw.work),
        ("luckyItem", &raw.lucky_item),
        ("luckyColor", &raw.lucky_color),
    ];
    if let Some((name, _)) = text_fields.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(FortuneError::SchemaInvalid(format!("{name} is empty")));
    }

    // Out-of-range ratings are rejected, not clamped.
    if !(RATING_MIN..=RATING_MAX).contains(&raw.rating) {
        return Err(FortuneError::SchemaInvalid(format!(
            "rating {} outside {RATING_MIN}-{RATING_MAX}",
            raw.rating
        )));
    }

    Ok(FortuneResult {
        overall: raw.overall,
        love: raw.love,
        work: raw.work,
        lucky_item: raw.lucky_item,
        lucky_color: raw.lucky_color,
        rating: raw.rating as u8,
    })
}
