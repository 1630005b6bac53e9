//! The appointment form controller.
//!
//! The form runs in one of two modes picked when it is loaded: creating a
//! new record, or editing the record named by the edit token. Submitting
//! validates the fields and upserts the record into the store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::page::Page;
use crate::record::{next_record_id, AppointmentDate, AppointmentRecord, Patient};
use crate::storage::RecordStore;
use crate::validation::{FieldMarkers, ValidationReport, Validator};

/// Form title when creating a record.
pub const CREATE_TITLE: &str = "New appointment";

/// Form title when editing a record.
pub const EDIT_TITLE: &str = "Editing appointment";

/// Every input on the form, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    /// Hidden id of the record being edited; empty when creating.
    pub record_id: String,
    /// Appointment day.
    pub day: String,
    /// Appointment month.
    pub month: String,
    /// Appointment year.
    pub year: String,
    /// Appointment hour.
    pub hour: String,
    /// Appointment minute.
    pub minute: String,
    /// Patient given name.
    pub first_name: String,
    /// Patient surname.
    pub last_name: String,
    /// Patient national id.
    pub national_id: String,
    /// Patient phone.
    pub phone: String,
    /// Patient date of birth.
    pub birth_date: String,
    /// Free-text notes.
    pub notes: String,
}

impl FormFields {
    /// Fill every input from a stored record.
    #[must_use]
    pub fn from_record(record: &AppointmentRecord) -> Self {
        Self {
            record_id: record.id.to_string(),
            day: record.date.day.clone(),
            month: record.date.month.clone(),
            year: record.date.year.clone(),
            hour: record.date.hour.clone(),
            minute: record.date.minute.clone(),
            first_name: record.patient.first_name.clone(),
            last_name: record.patient.last_name.clone(),
            national_id: record.patient.national_id.clone(),
            phone: record.patient.phone.clone(),
            birth_date: record.patient.birth_date.clone(),
            notes: record.notes.clone(),
        }
    }

    /// Collect the inputs into a candidate record with the given id.
    ///
    /// Name, surname, national id, phone and notes are trimmed; date parts
    /// and birth date are taken as typed.
    #[must_use]
    pub fn to_record(&self, id: i64) -> AppointmentRecord {
        AppointmentRecord::new(
            id,
            AppointmentDate {
                day: self.day.clone(),
                month: self.month.clone(),
                year: self.year.clone(),
                hour: self.hour.clone(),
                minute: self.minute.clone(),
            },
            Patient {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                national_id: self.national_id.trim().to_string(),
                phone: self.phone.trim().to_string(),
                birth_date: self.birth_date.clone(),
            },
            self.notes.trim(),
        )
    }
}

/// How the form was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    /// Blank form for a new record.
    Create,
    /// Pre-filled from the stored record with this id.
    Edit {
        /// Id of the record being edited.
        id: i64,
    },
    /// An edit token was given but no stored record matched it. The form
    /// is blank and submits as a new record.
    NotFound {
        /// The token as it appeared in the location.
        token: String,
    },
}

/// The form as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// How the form was entered.
    pub mode: FormMode,
    /// Heading shown above the inputs.
    pub title: String,
    /// Current input values.
    pub fields: FormFields,
    /// Inputs flagged by the last failed submission.
    pub markers: FieldMarkers,
}

impl FormView {
    fn blank(mode: FormMode) -> Self {
        Self {
            mode,
            title: CREATE_TITLE.to_string(),
            fields: FormFields::default(),
            markers: FieldMarkers::new(),
        }
    }
}

/// Result of submitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was stored.
    Invalid(ValidationReport),
    /// A new record was appended.
    Created {
        /// The id assigned to it.
        id: i64,
    },
    /// Stored records with the form's id were overwritten.
    Updated {
        /// The id that matched.
        id: i64,
        /// How many stored records carried it.
        replaced: usize,
    },
    /// The form carried an id that no stored record has. Nothing changed.
    Unmatched {
        /// The hidden id as submitted.
        id: String,
    },
}

impl SubmitOutcome {
    /// Where to go after submitting, or `None` to stay on the form.
    #[must_use]
    pub fn next_page(&self) -> Option<Page> {
        match self {
            Self::Invalid(_) => None,
            Self::Created { .. } | Self::Updated { .. } | Self::Unmatched { .. } => {
                Some(Page::Listing)
            }
        }
    }
}

/// Loads and submits the appointment form against a store.
#[derive(Debug)]
pub struct FormController<'a, S: RecordStore> {
    store: &'a S,
    validator: &'a Validator,
}

impl<'a, S: RecordStore> FormController<'a, S> {
    /// Bind the controller to a store and validator.
    #[must_use]
    pub fn new(store: &'a S, validator: &'a Validator) -> Self {
        Self { store, validator }
    }

    /// Prepare the form.
    ///
    /// With no edit token the form is blank. A token naming a stored record
    /// fills every input from it; any other token leaves the form blank in
    /// [`FormMode::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self, edit_token: Option<&str>) -> Result<FormView> {
        let Some(token) = edit_token else {
            return Ok(FormView::blank(FormMode::Create));
        };

        let found = match token.trim().parse::<i64>() {
            Ok(id) => self.store.find_by_id(id)?,
            Err(_) => None,
        };

        match found {
            Some(record) => {
                debug!(record_id = record.id, "Loaded appointment for editing");
                Ok(FormView {
                    mode: FormMode::Edit { id: record.id },
                    title: EDIT_TITLE.to_string(),
                    fields: FormFields::from_record(&record),
                    markers: FieldMarkers::new(),
                })
            }
            None => {
                warn!(token, "No appointment matches the edit token");
                Ok(FormView::blank(FormMode::NotFound {
                    token: token.to_string(),
                }))
            }
        }
    }

    /// Submit the form.
    ///
    /// Clears the view's markers, validates the inputs, and on failure
    /// marks the failing fields and stores nothing. Otherwise an empty
    /// hidden id appends a new record and a non-empty one overwrites every
    /// stored record with that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn submit(&self, view: &mut FormView) -> Result<SubmitOutcome> {
        self.submit_at(view, Utc::now().timestamp_millis())
    }

    fn submit_at(&self, view: &mut FormView, now_ms: i64) -> Result<SubmitOutcome> {
        view.markers.clear();

        let hidden_id = view.fields.record_id.trim().to_string();
        let report = self.validator.validate(&view.fields.to_record(0));
        if !report.is_valid() {
            view.markers.mark(&report);
            return Ok(SubmitOutcome::Invalid(report));
        }

        let mut records = self.store.load_all()?;

        if hidden_id.is_empty() {
            let id = next_record_id(now_ms, &records)?;
            records.push(view.fields.to_record(id));
            self.store.save_all(&records)?;
            info!(record_id = id, "Created appointment");
            return Ok(SubmitOutcome::Created { id });
        }

        let Ok(id) = hidden_id.parse::<i64>() else {
            warn!(id = %hidden_id, "Submitted appointment id is not a number");
            return Ok(SubmitOutcome::Unmatched { id: hidden_id });
        };

        let candidate = view.fields.to_record(id);
        let mut replaced = 0;
        for record in records.iter_mut().filter(|r| r.id == id) {
            *record = candidate.clone();
            replaced += 1;
        }

        if replaced == 0 {
            warn!(record_id = id, "No stored appointment to update");
            return Ok(SubmitOutcome::Unmatched { id: hidden_id });
        }

        self.store.save_all(&records)?;
        info!(record_id = id, replaced, "Updated appointment");
        Ok(SubmitOutcome::Updated { id, replaced })
    }
}
