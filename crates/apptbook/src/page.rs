//! Page locations and navigation.
//!
//! A location is a page name optionally followed by a query string, for
//! example `appointment-form.html?editId=17`. Page names and the edit
//! parameter come from [`NavigationConfig`].

use serde::Serialize;
use url::form_urlencoded;

use crate::config::NavigationConfig;
use crate::error::{Error, Result};

/// A page of the appointment book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    /// The appointment listing.
    Listing,
    /// The appointment form.
    Form {
        /// Edit token from the location, if any.
        edit: Option<String>,
    },
}

impl Page {
    /// The form page set up to edit the record with `id`.
    #[must_use]
    pub fn edit(id: i64) -> Self {
        Self::Form {
            edit: Some(id.to_string()),
        }
    }

    /// The form page for a new record.
    #[must_use]
    pub fn create() -> Self {
        Self::Form { edit: None }
    }

    /// Work out which page `location` points at.
    ///
    /// The path may carry leading directories (`/app/appointments.html`).
    /// Anything after `#` is ignored. On the form page, the first occurrence
    /// of the edit parameter becomes the edit token, even when its value is
    /// empty. Query keys and values are form-decoded (`%XX` and `+`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path names neither the listing nor the form page.
    pub fn from_location(location: &str, nav: &NavigationConfig) -> Result<Self> {
        let location = location.trim();
        let without_fragment = location.split_once('#').map_or(location, |(rest, _)| rest);
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        if names_page(path, &nav.listing_page) {
            return Ok(Self::Listing);
        }
        if names_page(path, &nav.form_page) {
            let edit = form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| *key == nav.edit_param.as_str())
                .map(|(_, value)| value.into_owned());
            return Ok(Self::Form { edit });
        }

        Err(Error::unknown_page(location))
    }

    /// Build the location of this page.
    #[must_use]
    pub fn location(&self, nav: &NavigationConfig) -> String {
        match self {
            Self::Listing => nav.listing_page.clone(),
            Self::Form { edit: None } => nav.form_page.clone(),
            Self::Form { edit: Some(token) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(&nav.edit_param, token)
                    .finish();
                format!("{}?{query}", nav.form_page)
            }
        }
    }
}

fn names_page(path: &str, page: &str) -> bool {
    path == page
        || path
            .strip_suffix(page)
            .is_some_and(|prefix| prefix.ends_with('/'))
}
