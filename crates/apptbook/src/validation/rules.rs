//! Form fields and the rules checked against them.

use serde::Serialize;

/// Eight digits followed by one letter.
pub const NATIONAL_ID_PATTERN: &str = r"^[0-9]{8}[A-Z]$";

/// A form field that validation can flag.
///
/// Variants are declared in check order, so sorting fields sorts them the
/// way the validator reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Patient given name.
    FirstName,
    /// Patient surname.
    LastName,
    /// Patient national id.
    NationalId,
    /// Patient phone.
    Phone,
    /// Appointment day.
    Day,
    /// Appointment month.
    Month,
    /// Appointment year.
    Year,
    /// Appointment hour.
    Hour,
    /// Appointment minute.
    Minute,
}

impl Field {
    /// The five date parts, in check order.
    pub const DATE_PARTS: [Field; 5] = [
        Field::Day,
        Field::Month,
        Field::Year,
        Field::Hour,
        Field::Minute,
    ];

    /// Identifier of the field as it appears in the stored record.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::NationalId => "nationalId",
            Self::Phone => "phone",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }

    /// Message shown next to the field when it fails.
    #[must_use]
    pub fn requirement(self) -> &'static str {
        match self {
            Self::FirstName => "first name is required",
            Self::LastName => "last name is required",
            Self::NationalId => "national id must be 8 digits followed by a letter",
            Self::Phone => "phone must be a number",
            Self::Day => "day is required",
            Self::Month => "month is required",
            Self::Year => "year is required",
            Self::Hour => "hour is required",
            Self::Minute => "minute is required",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Whether `value` is non-empty and reads as a number.
///
/// Surrounding whitespace is ignored. Decimal, signed and exponent forms
/// pass; `NaN` does not.
#[must_use]
pub fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().is_ok_and(|n| !n.is_nan())
}
