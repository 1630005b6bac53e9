//! The appointment listing: table rendering and the delete flow.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{DisplayConfig, NavigationConfig};
use crate::error::Result;
use crate::page::Page;
use crate::record::AppointmentRecord;
use crate::storage::RecordStore;

/// Question asked before a record is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this appointment?";

/// Column headings of the listing table.
const HEADINGS: [&str; 5] = ["#", "Patient", "Date", "Phone", "Actions"];

/// An action offered on a listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RowAction {
    /// Open the form pre-loaded with the record.
    Modify {
        /// Where the form page lives, edit parameter included.
        location: String,
    },
    /// Remove the record after confirmation.
    Delete {
        /// Id of the record to remove.
        id: i64,
    },
}

impl std::fmt::Display for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Modify { location } => write!(f, "modify: {location}"),
            Self::Delete { id } => write!(f, "delete: {id}"),
        }
    }
}

/// One displayed appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    /// 1-based position in the stored list.
    pub sequence: usize,
    /// Id of the record shown.
    pub record_id: i64,
    /// `first last`.
    pub patient_name: String,
    /// `day/month/year hour:minute`.
    pub when: String,
    /// Contact phone.
    pub phone: String,
    /// Modify and delete, in that order.
    pub actions: Vec<RowAction>,
}

impl RecordRow {
    fn cells(&self) -> [String; 5] {
        let actions = self
            .actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("  ");
        [
            self.sequence.to_string(),
            self.patient_name.clone(),
            self.when.clone(),
            self.phone.clone(),
            actions,
        ]
    }
}

/// A row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    /// An appointment.
    Record(RecordRow),
    /// Stands in for the table body when there is nothing to show.
    Placeholder {
        /// Text shown across the row.
        text: String,
    },
}

/// The rendered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    rows: Vec<Row>,
}

impl Listing {
    /// Every row, in display order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// True when the only row is the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [Row::Placeholder { .. }])
    }

    /// One line per row.
    #[must_use]
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            match row {
                Row::Record(r) => {
                    let [seq, name, when, phone, actions] = r.cells();
                    out.push_str(&format!("{seq}. {name} | {when} | {phone} | {actions}\n"));
                }
                Row::Placeholder { text } => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Aligned columns under a heading line.
    #[must_use]
    pub fn to_table(&self) -> String {
        let cells: Vec<Option<[String; 5]>> = self
            .rows
            .iter()
            .map(|row| match row {
                Row::Record(r) => Some(r.cells()),
                Row::Placeholder { .. } => None,
            })
            .collect();

        let mut widths = HEADINGS.map(|h| h.chars().count());
        for row in cells.iter().flatten() {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |values: &[&str]| {
            let line = values
                .iter()
                .zip(widths)
                .map(|(value, width)| format!("{value:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{}\n", line.trim_end())
        };

        let mut out = format_line(&HEADINGS);
        let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for (row, cell) in self.rows.iter().zip(&cells) {
            match (row, cell) {
                (_, Some(values)) => {
                    let values: Vec<&str> = values.iter().map(String::as_str).collect();
                    out.push_str(&format_line(&values));
                }
                (Row::Placeholder { text }, None) => {
                    out.push_str(text);
                    out.push('\n');
                }
                (Row::Record(_), None) => {}
            }
        }
        out
    }
}

/// Turns the stored list into a [`Listing`].
#[derive(Debug, Clone)]
pub struct TableRenderer {
    placeholder: String,
    navigation: NavigationConfig,
}

impl TableRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new(display: &DisplayConfig, navigation: &NavigationConfig) -> Self {
        Self {
            placeholder: display.empty_placeholder.clone(),
            navigation: navigation.clone(),
        }
    }

    /// One row per record in stored order, or a single placeholder row.
    #[must_use]
    pub fn render(&self, records: &[AppointmentRecord]) -> Listing {
        if records.is_empty() {
            return Listing {
                rows: vec![Row::Placeholder {
                    text: self.placeholder.clone(),
                }],
            };
        }

        let rows = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                Row::Record(RecordRow {
                    sequence: i + 1,
                    record_id: record.id,
                    patient_name: record.patient.full_name(),
                    when: record.date.to_string(),
                    phone: record.patient.phone.clone(),
                    actions: vec![
                        RowAction::Modify {
                            location: Page::edit(record.id).location(&self.navigation),
                        },
                        RowAction::Delete { id: record.id },
                    ],
                })
            })
            .collect();

        Listing { rows }
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new(&DisplayConfig::default(), &NavigationConfig::default())
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Show `message` and wait for an answer.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Answers every confirmation with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing changed.
    Cancelled,
    /// The list was rewritten without the record.
    Deleted {
        /// How many stored records carried the id.
        removed: usize,
        /// The listing after the removal.
        listing: Listing,
    },
}

/// The listing page bound to a store.
#[derive(Debug)]
pub struct ListingPage<'a, S: RecordStore> {
    store: &'a S,
    renderer: TableRenderer,
}

impl<'a, S: RecordStore> ListingPage<'a, S> {
    /// Bind a renderer to a store.
    #[must_use]
    pub fn new(store: &'a S, renderer: TableRenderer) -> Self {
        Self { store, renderer }
    }

    /// Load the stored list and render it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn show(&self) -> Result<Listing> {
        let records = self.store.load_all()?;
        debug!(count = records.len(), "Rendering listing");
        Ok(self.renderer.render(&records))
    }

    /// Delete every record with `id` once `confirmer` agrees, then render
    /// the listing again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn delete(&self, id: i64, confirmer: &mut dyn Confirm) -> Result<DeleteOutcome> {
        if !confirmer.confirm(DELETE_PROMPT) {
            debug!(record_id = id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let records = self.store.load_all()?;
        let before = records.len();
        let kept: Vec<AppointmentRecord> = records.into_iter().filter(|r| r.id != id).collect();
        let removed = before - kept.len();

        self.store.save_all(&kept)?;
        info!(record_id = id, removed, "Deleted appointment");

        Ok(DeleteOutcome::Deleted {
            removed,
            listing: self.renderer.render(&kept),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::valid_record;
    use crate::storage::MemoryStore;

    fn record_rows(listing: &Listing) -> Vec<&RecordRow> {
        listing
            .rows()
            .iter()
            .filter_map(|row| match row {
                Row::Record(r) => Some(r),
                Row::Placeholder { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_render_empty_is_single_placeholder() {
        let listing = TableRenderer::default().render(&[]);

        assert_eq!(listing.rows().len(), 1);
        assert!(listing.is_placeholder());
        assert_eq!(
            listing.rows()[0],
            Row::Placeholder {
                text: "no data".to_string()
            }
        );
    }

    #[test]
    fn test_render_rows_in_stored_order() {
        let mut second = valid_record(7);
        second.patient.first_name = "Luis".to_string();
        second.patient.last_name = "Gil Pérez".to_string();
        second.patient.phone = "699000111".to_string();
        second.date.hour = "17".to_string();
        second.date.minute = "45".to_string();

        let listing = TableRenderer::default().render(&[valid_record(9), second]);
        let rows = record_rows(&listing);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sequence, 1);
        assert_eq!(rows[0].record_id, 9);
        assert_eq!(rows[1].sequence, 2);
        assert_eq!(rows[1].patient_name, "Luis Gil Pérez");
        assert_eq!(rows[1].when, "3/4/2025 17:45");
        assert_eq!(rows[1].phone, "699000111");
    }

    #[test]
    fn test_render_row_actions() {
        let listing = TableRenderer::default().render(&[valid_record(42)]);
        let rows = record_rows(&listing);

        assert_eq!(
            rows[0].actions,
            vec![
                RowAction::Modify {
                    location: "appointment-form.html?editId=42".to_string()
                },
                RowAction::Delete { id: 42 },
            ]
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = MemoryStore::new();
        store.save_all(&[valid_record(1), valid_record(2)]).unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        assert_eq!(page.show().unwrap(), page.show().unwrap());
    }

    #[test]
    fn test_custom_placeholder() {
        let display = DisplayConfig {
            empty_placeholder: "dato vacío".to_string(),
            ..DisplayConfig::default()
        };
        let renderer = TableRenderer::new(&display, &NavigationConfig::default());
        assert_eq!(renderer.render(&[]).to_plain(), "dato vacío\n");
    }

    #[test]
    fn test_to_plain() {
        let listing = TableRenderer::default().render(&[valid_record(5)]);
        assert_eq!(
            listing.to_plain(),
            "1. Ana Ruiz | 3/4/2025 9:5 | 612345678 | modify: appointment-form.html?editId=5  delete: 5\n"
        );
    }

    #[test]
    fn test_to_table_aligns_columns() {
        let listing = TableRenderer::default().render(&[valid_record(5), valid_record(6)]);
        let table = listing.to_table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  Patient"));
        assert!(lines[1].chars().all(|c| c == '-'));
        let date_col = lines[0].find("Date").unwrap();
        assert_eq!(lines[2].find("3/4/2025"), Some(date_col));
        assert_eq!(lines[3].find("3/4/2025"), Some(date_col));
    }

    #[test]
    fn test_to_table_placeholder() {
        let table = TableRenderer::default().render(&[]).to_table();
        assert_eq!(table.lines().last(), Some("no data"));
    }

    #[test]
    fn test_listing_serializes_rows() {
        let json = serde_json::to_value(TableRenderer::default().render(&[valid_record(3)])).unwrap();
        assert_eq!(json["rows"][0]["kind"], "record");
        assert_eq!(json["rows"][0]["actions"][1]["action"], "delete");
        assert_eq!(json["rows"][0]["actions"][1]["id"], 3);
    }

    #[test]
    fn test_delete_removes_matching_record() {
        let store = MemoryStore::new();
        store.save_all(&[valid_record(1), valid_record(2)]).unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        let outcome = page.delete(1, &mut AutoConfirm(true)).unwrap();

        assert_eq!(store.load_all().unwrap(), vec![valid_record(2)]);
        match outcome {
            DeleteOutcome::Deleted { removed, listing } => {
                assert_eq!(removed, 1);
                assert_eq!(record_rows(&listing).len(), 1);
                assert_eq!(record_rows(&listing)[0].record_id, 2);
            }
            DeleteOutcome::Cancelled => panic!("Expected Deleted outcome"),
        }
    }

    #[test]
    fn test_delete_removes_all_duplicates() {
        let store = MemoryStore::new();
        store
            .save_all(&[valid_record(1), valid_record(2), valid_record(1)])
            .unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        let outcome = page.delete(1, &mut AutoConfirm(true)).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted { removed: 2, .. }));
        assert_eq!(store.load_all().unwrap(), vec![valid_record(2)]);
    }

    #[test]
    fn test_delete_last_record_renders_placeholder() {
        let store = MemoryStore::new();
        store.save_all(&[valid_record(1)]).unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        match page.delete(1, &mut AutoConfirm(true)).unwrap() {
            DeleteOutcome::Deleted { listing, .. } => assert!(listing.is_placeholder()),
            DeleteOutcome::Cancelled => panic!("Expected Deleted outcome"),
        }
    }

    #[test]
    fn test_delete_cancelled_keeps_list() {
        let store = MemoryStore::new();
        store.save_all(&[valid_record(1), valid_record(2)]).unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        let outcome = page.delete(1, &mut AutoConfirm(false)).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_asks_with_prompt() {
        let store = MemoryStore::new();
        let page = ListingPage::new(&store, TableRenderer::default());
        let mut asked = Vec::new();

        let mut confirmer = |message: &str| {
            asked.push(message.to_string());
            false
        };
        page.delete(1, &mut confirmer).unwrap();

        assert_eq!(asked, vec![DELETE_PROMPT.to_string()]);
    }

    #[test]
    fn test_delete_unknown_id_reports_zero() {
        let store = MemoryStore::new();
        store.save_all(&[valid_record(1)]).unwrap();
        let page = ListingPage::new(&store, TableRenderer::default());

        let outcome = page.delete(99, &mut AutoConfirm(true)).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted { removed: 0, .. }));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
