//! `apptbook` - A local appointment book for patient scheduling
//!
//! Appointments are kept as one serialized list in a local key-value store.
//! The library provides the record store, field validation, the listing
//! table, the appointment form, and the page bootstrap that ties them
//! together.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod listing;
pub mod logging;
pub mod page;
pub mod record;
pub mod storage;
pub mod validation;

pub use app::{App, PageView};
pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormController, FormFields, FormMode, FormView, SubmitOutcome};
pub use listing::{Confirm, DeleteOutcome, Listing, ListingPage, TableRenderer};
pub use logging::init_logging;
pub use page::Page;
pub use record::{AppointmentDate, AppointmentRecord, Patient};
pub use storage::{MemoryStore, RecordStore, SqliteStore, StoreStats};
pub use validation::{Field, FieldMarkers, ValidationReport, Validator};
