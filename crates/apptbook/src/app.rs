//! Page bootstrap.
//!
//! [`App`] owns the store, validator and configuration, and opens whichever
//! page a location points at.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::form::{FormController, FormView};
use crate::listing::{Listing, ListingPage, TableRenderer};
use crate::page::Page;
use crate::storage::{RecordStore, SqliteStore};
use crate::validation::Validator;

/// What opening a page produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// The rendered listing.
    Listing(Listing),
    /// The loaded form.
    Form(FormView),
}

/// The appointment book wired to a store.
#[derive(Debug)]
pub struct App<S: RecordStore> {
    config: Config,
    store: S,
    validator: Validator,
}

impl App<SqliteStore> {
    /// Open the configured `SQLite` store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the
    /// configuration's validation rules are invalid.
    pub fn open(config: Config) -> Result<Self> {
        let store = SqliteStore::open(config.database_path(), config.storage.key.clone())?;
        Self::with_store(config, store)
    }
}

impl<S: RecordStore> App<S> {
    /// Wire the components around `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured national id pattern is invalid.
    pub fn with_store(config: Config, store: S) -> Result<Self> {
        let validator = Validator::from_config(&config.validation)?;
        Ok(Self {
            config,
            store,
            validator,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The listing page.
    #[must_use]
    pub fn listing(&self) -> ListingPage<'_, S> {
        ListingPage::new(
            &self.store,
            TableRenderer::new(&self.config.display, &self.config.navigation),
        )
    }

    /// The form controller.
    #[must_use]
    pub fn form(&self) -> FormController<'_, S> {
        FormController::new(&self.store, &self.validator)
    }

    /// Open `page` and produce its view.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open_page(&self, page: &Page) -> Result<PageView> {
        debug!(?page, "Opening page");
        match page {
            Page::Listing => Ok(PageView::Listing(self.listing().show()?)),
            Page::Form { edit } => Ok(PageView::Form(self.form().load(edit.as_deref())?)),
        }
    }

    /// Resolve `location` and open the page it names.
    ///
    /// # Errors
    ///
    /// Returns an error if the location names no known page or the store
    /// cannot be read.
    pub fn open_location(&self, location: &str) -> Result<PageView> {
        let page = Page::from_location(location, &self.config.navigation)?;
        self.open_page(&page)
    }

    /// Location of `page` under the active navigation settings.
    #[must_use]
    pub fn location_of(&self, page: &Page) -> String {
        page.location(&self.config.navigation)
    }
}
