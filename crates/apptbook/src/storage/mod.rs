//! Storage layer for apptbook.
//!
//! The whole appointment list lives as one JSON blob under a single key.
//! Every operation reads the full list, changes it in memory, and writes it
//! back in full. [`RecordStore`] is the seam the rest of the crate depends
//! on; [`SqliteStore`] persists to disk and [`MemoryStore`] keeps the blob in
//! memory.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use tracing::{debug, warn};

use crate::error::Result;
use crate::record::AppointmentRecord;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A key-value store holding the serialized appointment list.
///
/// Implementors only move the raw blob; encoding, decoding and lookups are
/// provided on top of that.
pub trait RecordStore {
    /// Read the raw blob, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn read_blob(&self) -> Result<Option<String>>;

    /// Replace the raw blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn write_blob(&self, blob: &str) -> Result<()>;

    /// Where the blob lives, for status output.
    fn location(&self) -> String;

    /// Load every stored record in insertion order.
    ///
    /// A missing blob is an empty list. A blob that does not decode is also
    /// treated as an empty list, with a warning logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn load_all(&self) -> Result<Vec<AppointmentRecord>> {
        match self.read_blob()? {
            None => Ok(Vec::new()),
            Some(blob) => Ok(decode_records(&blob)),
        }
    }

    /// Overwrite the stored list with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn save_all(&self, records: &[AppointmentRecord]) -> Result<()> {
        let blob = serde_json::to_string(records)?;
        self.write_blob(&blob)?;
        debug!(count = records.len(), "Saved appointment list");
        Ok(())
    }

    /// Find the first stored record with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn find_by_id(&self, id: i64) -> Result<Option<AppointmentRecord>> {
        Ok(self.load_all()?.into_iter().find(|record| record.id == id))
    }

    /// Summarize what is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn stats(&self) -> Result<StoreStats> {
        let blob = self.read_blob()?;
        let blob_size_bytes = blob.as_ref().map_or(0, String::len);
        let total_records = blob.as_deref().map_or(0, |b| decode_records(b).len());
        Ok(StoreStats {
            total_records,
            blob_size_bytes,
            location: self.location(),
        })
    }
}

/// Statistics about the stored list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of records that decode from the blob.
    pub total_records: usize,
    /// Size of the serialized blob in bytes.
    pub blob_size_bytes: usize,
    /// Where the blob is stored.
    pub location: String,
}

/// Decode a stored blob, falling back to an empty list if it is corrupt.
fn decode_records(blob: &str) -> Vec<AppointmentRecord> {
    match serde_json::from_str(blob) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Stored appointment list is corrupt, treating it as empty");
            Vec::new()
        }
    }
}
