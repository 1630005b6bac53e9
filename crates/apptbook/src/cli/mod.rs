//! Command-line interface for apptbook.
//!
//! This module provides the CLI structure, the terminal confirmation
//! prompt, and text rendering for the form.

mod commands;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::form::FormView;
use crate::listing::Confirm;
use crate::validation::Field;

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, FieldArgs, ListCommand, OpenCommand,
    OutputFormat, ShowCommand, StatusCommand, SubmitCommand,
};

/// apptbook - Keep track of patient appointments
///
/// Appointments are stored locally as a single list. Create, edit, list
/// and delete them from the command line.
#[derive(Debug, Parser)]
#[command(name = "apptbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all appointments
    List(ListCommand),

    /// Show one appointment in the form
    Show(ShowCommand),

    /// Create an appointment
    Add(AddCommand),

    /// Change fields of an existing appointment
    Edit(EditCommand),

    /// Submit the form with explicit values, including the hidden id
    Submit(SubmitCommand),

    /// Delete an appointment
    Delete(DeleteCommand),

    /// Open a page by its location
    Open(OpenCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

/// Asks on the terminal and reads a yes/no answer.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Prompt on `output` and read answers from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if write!(self.output, "{message} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Render the form as labelled lines, flagging marked fields.
#[must_use]
pub fn render_form(view: &FormView) -> String {
    let f = &view.fields;
    let lines: [(&str, &str, Option<Field>); 12] = [
        ("Id", f.record_id.as_str(), None),
        ("Day", f.day.as_str(), Some(Field::Day)),
        ("Month", f.month.as_str(), Some(Field::Month)),
        ("Year", f.year.as_str(), Some(Field::Year)),
        ("Hour", f.hour.as_str(), Some(Field::Hour)),
        ("Minute", f.minute.as_str(), Some(Field::Minute)),
        ("First name", f.first_name.as_str(), Some(Field::FirstName)),
        ("Last name", f.last_name.as_str(), Some(Field::LastName)),
        ("National id", f.national_id.as_str(), Some(Field::NationalId)),
        ("Phone", f.phone.as_str(), Some(Field::Phone)),
        ("Birth date", f.birth_date.as_str(), None),
        ("Notes", f.notes.as_str(), None),
    ];

    let mut out = format!("{}\n{}\n", view.title, "=".repeat(view.title.chars().count()));
    for (label, value, field) in lines {
        let label = format!("{label}:");
        out.push_str(&format!("  {label:<13}{value}"));
        if let Some(field) = field.filter(|f| view.markers.is_marked(*f)) {
            out.push_str(&format!("   <- {}", field.requirement()));
        }
        out.push('\n');
    }
    out
}
