//! Fortune request/response data models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fortune::error::FortuneError;

/// Wire format of `birthDate`.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// User-facing validation messages.
pub const MISSING_FIELDS_MESSAGE: &str = "生年月日と血液型を入力してください。";
pub const BIRTH_DATE_FORMAT_MESSAGE: &str = "生年月日はYYYY-MM-DD形式で入力してください。";
pub const FUTURE_BIRTH_DATE_MESSAGE: &str = "生年月日に未来の日付は指定できません。";
pub const BLOOD_TYPE_MESSAGE: &str = "血液型はA・B・O・ABのいずれかを選んでください。";

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// ABO blood type as selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodType {
    A,
    B,
    O,
    AB,
}

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::A => "A",
            BloodType::B => "B",
            BloodType::O => "O",
            BloodType::AB => "AB",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = FortuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(BloodType::A),
            "B" => Ok(BloodType::B),
            "O" => Ok(BloodType::O),
            "AB" => Ok(BloodType::AB),
            "" => Err(FortuneError::InvalidInput(MISSING_FIELDS_MESSAGE.to_string())),
            other => {
                tracing::debug!("Rejected blood type '{other}'");
                Err(FortuneError::InvalidInput(BLOOD_TYPE_MESSAGE.to_string()))
            }
        }
    }
}

/// Tone/persona selector. Only affects prompt phrasing, never the output schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Yumekawa,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Normal, Mode::Yumekawa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Yumekawa => "yumekawa",
        }
    }

    /// Resolves a wire tag to a mode. Absent, blank, or unknown tags fall back
    /// to the baseline persona.
    pub fn from_tag(tag: Option<&str>) -> Mode {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return Mode::default();
        };
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or_else(|| {
                tracing::debug!("Unknown mode '{tag}', using baseline persona");
                Mode::default()
            })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Inbound request body, exactly as the caller sent it.
///
/// Every field defaults so that a missing key surfaces as `InvalidInput`
/// from [`FortuneRequest::validate`] instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRequest {
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub blood_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl FortuneRequest {
    pub fn new(birth_date: &str, blood_type: &str, mode: Option<&str>) -> Self {
        Self {
            birth_date: birth_date.to_string(),
            blood_type: blood_type.to_string(),
            mode: mode.map(str::to_string),
        }
    }

    /// Checks required fields and resolves the mode.
    ///
    /// `today` bounds the birth date: a fortune for someone not yet born is rejected.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedRequest, FortuneError> {
        let birth_date = self.birth_date.trim();
        if birth_date.is_empty() {
            return Err(FortuneError::InvalidInput(MISSING_FIELDS_MESSAGE.to_string()));
        }

        // chrono accepts unpadded fields and a leading sign; only the canonical
        // spelling is allowed so one calendar date has exactly one cache key.
        let parsed = NaiveDate::parse_from_str(birth_date, BIRTH_DATE_FORMAT)
            .ok()
            .filter(|d| d.format(BIRTH_DATE_FORMAT).to_string() == birth_date)
            .ok_or_else(|| {
                FortuneError::InvalidInput(BIRTH_DATE_FORMAT_MESSAGE.to_string())
            })?;
        if parsed > today {
            return Err(FortuneError::InvalidInput(
                FUTURE_BIRTH_DATE_MESSAGE.to_string(),
            ));
        }

        let blood_type = self.blood_type.parse::<BloodType>()?;

        Ok(ValidatedRequest {
            birth_date: birth_date.to_string(),
            blood_type,
            mode: Mode::from_tag(self.mode.as_deref()),
        })
    }
}

/// A request that passed validation. The only input the prompt builder accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Canonical `YYYY-MM-DD` string as sent by the caller.
    pub birth_date: String,
    pub blood_type: BloodType,
    pub mode: Mode,
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// A validated daily fortune. Only the parser constructs these from provider output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneResult {
    pub overall: String,
    pub love: String,
    pub work: String,
    pub lucky_item: String,
    pub lucky_color: String,
    /// 1-100 inclusive
    pub rating: u8,
}
