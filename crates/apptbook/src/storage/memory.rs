//! In-memory record store.

use std::cell::RefCell;

use crate::error::Result;

use super::RecordStore;

/// Keeps the serialized list in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `blob`, as if it had been written
    /// earlier.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }
}

impl RecordStore for MemoryStore {
    fn read_blob(&self) -> Result<Option<String>> {
        Ok(self.blob.borrow().clone())
    }

    fn write_blob(&self, blob: &str) -> Result<()> {
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}
