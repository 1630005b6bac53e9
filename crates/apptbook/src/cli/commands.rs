//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::form::FormFields;

/// Form inputs accepted on the command line.
///
/// Only the flags given are applied; the rest of the form keeps its
/// current values.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Appointment day
    #[arg(long)]
    pub day: Option<String>,

    /// Appointment month
    #[arg(long)]
    pub month: Option<String>,

    /// Appointment year
    #[arg(long)]
    pub year: Option<String>,

    /// Appointment hour
    #[arg(long)]
    pub hour: Option<String>,

    /// Appointment minute
    #[arg(long)]
    pub minute: Option<String>,

    /// Patient first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Patient last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Patient national id (8 digits and a letter)
    #[arg(long)]
    pub national_id: Option<String>,

    /// Patient phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Patient date of birth
    #[arg(long)]
    pub birth_date: Option<String>,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl FieldArgs {
    /// Copy every given flag into `fields`.
    pub fn apply(&self, fields: &mut FormFields) {
        let pairs = [
            (&self.day, &mut fields.day),
            (&self.month, &mut fields.month),
            (&self.year, &mut fields.year),
            (&self.hour, &mut fields.hour),
            (&self.minute, &mut fields.minute),
            (&self.first_name, &mut fields.first_name),
            (&self.last_name, &mut fields.last_name),
            (&self.national_id, &mut fields.national_id),
            (&self.phone, &mut fields.phone),
            (&self.birth_date, &mut fields.birth_date),
            (&self.notes, &mut fields.notes),
        ];
        for (arg, field) in pairs {
            if let Some(value) = arg {
                field.clone_from(value);
            }
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the appointment
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Form inputs
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the appointment to edit
    pub id: i64,

    /// Inputs to change
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Hidden record id; leave out to create a new appointment
    #[arg(long)]
    pub id: Option<String>,

    /// Form inputs
    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the appointment to delete
    pub id: i64,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Open command arguments.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Page location, e.g. "appointment-form.html?editId=17"
    pub location: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per appointment
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON output
    Json,
}
