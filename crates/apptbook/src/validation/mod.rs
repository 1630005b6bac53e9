//! Field validation for appointment records.
//!
//! Validation is pure: [`Validator::validate`] returns a
//! [`ValidationReport`] naming every failing [`Field`], in check order.
//! Highlighting those fields is a separate concern handled by
//! [`FieldMarkers`].
//!
//! # Example
//!
//! ```
//! use apptbook::record::{AppointmentDate, AppointmentRecord, Patient};
//! use apptbook::validation::{Field, Validator};
//!
//! let validator = Validator::new();
//! let record = AppointmentRecord::new(1, AppointmentDate::default(), Patient::default(), "");
//!
//! let report = validator.validate(&record);
//! assert!(!report.is_valid());
//! assert_eq!(report.invalid_fields()[0], Field::FirstName);
//! ```

mod rules;
mod validator;

pub use rules::{is_numeric, Field, NATIONAL_ID_PATTERN};
pub use validator::{FieldMarkers, ValidationReport, Validator};
