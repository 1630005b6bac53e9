//! Appointment record types.
//!
//! These are the values persisted in the record list. Field names serialize
//! in camelCase so the stored blob reads `firstName`, `nationalId`, and so on.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// When an appointment takes place.
///
/// Every part is kept as the text the form produced. No calendar check is
/// made beyond the validator's non-empty rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDate {
    /// Day of month.
    #[serde(default, deserialize_with = "text_or_number")]
    pub day: String,
    /// Month.
    #[serde(default, deserialize_with = "text_or_number")]
    pub month: String,
    /// Year.
    #[serde(default, deserialize_with = "text_or_number")]
    pub year: String,
    /// Hour of day.
    #[serde(default, deserialize_with = "text_or_number")]
    pub hour: String,
    /// Minute.
    #[serde(default, deserialize_with = "text_or_number")]
    pub minute: String,
}

impl std::fmt::Display for AppointmentDate {
    /// `day/month/year hour:minute`, without zero-padding.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{} {}:{}",
            self.day, self.month, self.year, self.hour, self.minute
        )
    }
}

/// The patient an appointment is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Surname(s).
    #[serde(default)]
    pub last_name: String,
    /// National identity document number (8 digits and a letter).
    #[serde(default)]
    pub national_id: String,
    /// Contact phone number.
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: String,
    /// Date of birth, as entered.
    #[serde(default)]
    pub birth_date: String,
}

impl Patient {
    /// First name and surname separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single appointment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    /// Unique identifier, assigned once at creation.
    pub id: i64,
    /// When the appointment takes place.
    pub date: AppointmentDate,
    /// Who the appointment is for.
    pub patient: Patient,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl AppointmentRecord {
    /// Build a record from its parts.
    #[must_use]
    pub fn new(id: i64, date: AppointmentDate, patient: Patient, notes: impl Into<String>) -> Self {
        Self {
            id,
            date,
            patient,
            notes: notes.into(),
        }
    }
}

/// Pick an id for a new record.
///
/// Uses the current time in milliseconds unless a stored record already has
/// that id or a later one, in which case the next id after the largest stored
/// id is used. Ids handed out this way strictly increase within one store and
/// never collide with a stored id.
///
/// # Errors
///
/// Returns [`Error::RecordIdsExhausted`] if the largest stored id is
/// `i64::MAX`.
pub fn next_record_id(now_ms: i64, existing: &[AppointmentRecord]) -> Result<i64> {
    let Some(max) = existing.iter().map(|record| record.id).max() else {
        return Ok(now_ms);
    };
    let after = max
        .checked_add(1)
        .ok_or(Error::RecordIdsExhausted { max })?;
    Ok(now_ms.max(after))
}

/// Accept either a JSON string or a JSON number for a text field.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record that passes every validation rule.
    pub fn valid_record(id: i64) -> AppointmentRecord {
        AppointmentRecord::new(
            id,
            AppointmentDate {
                day: "3".to_string(),
                month: "4".to_string(),
                year: "2025".to_string(),
                hour: "9".to_string(),
                minute: "5".to_string(),
            },
            Patient {
                first_name: "Ana".to_string(),
                last_name: "Ruiz".to_string(),
                national_id: "12345678Z".to_string(),
                phone: "612345678".to_string(),
                birth_date: "1990-01-01".to_string(),
            },
            "",
        )
    }
}
