//! The record validator and the field markers it feeds.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::record::AppointmentRecord;

use super::rules::{is_numeric, Field, NATIONAL_ID_PATTERN};

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    invalid: Vec<Field>,
}

impl ValidationReport {
    /// True when no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// The failing fields, in check order.
    #[must_use]
    pub fn invalid_fields(&self) -> &[Field] {
        &self.invalid
    }

    /// Whether `field` failed.
    #[must_use]
    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }
}

/// Checks candidate records against the field rules.
#[derive(Debug, Clone)]
pub struct Validator {
    national_id: Regex,
}

impl Validator {
    /// Create a validator with the built-in national id rule.
    ///
    /// # Panics
    ///
    /// Panics if the built-in pattern is invalid, which is a bug.
    #[must_use]
    pub fn new() -> Self {
        Self {
            national_id: RegexBuilder::new(NATIONAL_ID_PATTERN)
                .case_insensitive(true)
                .build()
                .expect("Invalid built-in national id pattern"),
        }
    }

    /// Create a validator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured national id pattern is not a valid regex.
    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        let national_id = RegexBuilder::new(&config.national_id_pattern)
            .case_insensitive(config.case_insensitive)
            .build()
            .map_err(|e| Error::ConfigValidation {
                message: format!(
                    "invalid regex pattern: {} ({e})",
                    config.national_id_pattern
                ),
            })?;
        Ok(Self { national_id })
    }

    /// Check every rule against `record`.
    ///
    /// All rules run even after one fails, so the report lists every
    /// failing field.
    #[must_use]
    pub fn validate(&self, record: &AppointmentRecord) -> ValidationReport {
        let patient = &record.patient;
        let date = &record.date;
        let mut invalid = Vec::new();

        if patient.first_name.is_empty() {
            invalid.push(Field::FirstName);
        }
        if patient.last_name.is_empty() {
            invalid.push(Field::LastName);
        }
        if !self.national_id.is_match(&patient.national_id) {
            invalid.push(Field::NationalId);
        }
        if !is_numeric(&patient.phone) {
            invalid.push(Field::Phone);
        }

        let parts = [&date.day, &date.month, &date.year, &date.hour, &date.minute];
        for (field, value) in Field::DATE_PARTS.into_iter().zip(parts) {
            if value.is_empty() {
                invalid.push(field);
            }
        }

        if !invalid.is_empty() {
            debug!(record_id = record.id, fields = ?invalid, "Record failed validation");
        }
        ValidationReport { invalid }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Which form fields are currently flagged as invalid.
///
/// Markers persist until cleared, so a failed submission keeps its
/// highlights until the next attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMarkers {
    marked: BTreeSet<Field>,
}

impl FieldMarkers {
    /// Create an empty marker set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.marked.clear();
    }

    /// Flag every field the report lists.
    pub fn mark(&mut self, report: &ValidationReport) {
        self.marked.extend(report.invalid_fields().iter().copied());
    }

    /// Whether `field` is flagged.
    #[must_use]
    pub fn is_marked(&self, field: Field) -> bool {
        self.marked.contains(&field)
    }

    /// Whether no field is flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Flagged fields in check order.
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.marked.iter().copied()
    }
}
