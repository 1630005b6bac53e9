//! Configuration management for apptbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation::NATIONAL_ID_PATTERN;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "apptbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "appointments.db";

/// Prefix of the environment variables read into the configuration.
const ENV_PREFIX: &str = "APPTBOOK_";

/// Top-level configuration sections, as they appear in the TOML file.
const SECTIONS: [&str; 4] = ["storage", "validation", "navigation", "display"];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `APPTBOOK_`, for example
///    `APPTBOOK_DISPLAY_CONFIRM_DELETE=false`)
/// 2. TOML config file at `~/.config/apptbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Field validation configuration.
    pub validation: ValidationConfig,
    /// Page locations and the edit parameter.
    pub navigation: NavigationConfig,
    /// Listing and prompt behaviour.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/apptbook/appointments.db`
    pub database_path: Option<PathBuf>,
    /// Key under which the serialized record list is stored.
    pub key: String,
}

/// Validation-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Regex a national id must match in full.
    pub national_id_pattern: String,
    /// Match the national id pattern ignoring letter case.
    pub case_insensitive: bool,
}

/// Navigation-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Location of the listing page.
    pub listing_page: String,
    /// Location of the form page.
    pub form_page: String,
    /// Query parameter carrying the id of the record to edit.
    pub edit_param: String,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Text of the single row shown when there are no appointments.
    pub empty_placeholder: String,
    /// Ask before deleting an appointment.
    pub confirm_delete: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            key: "appointments".to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            national_id_pattern: NATIONAL_ID_PATTERN.to_string(),
            case_insensitive: true,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            listing_page: "appointments.html".to_string(),
            form_page: "appointment-form.html".to_string(),
            edit_param: "editId".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            empty_placeholder: "no data".to_string(),
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::extract(&config_file, ENV_PREFIX)
    }

    fn extract(config_file: &Path, env_prefix: &str) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(env_prefix).map(section_key));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        if self.navigation.edit_param.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "edit_param must not be empty".to_string(),
            });
        }

        if self.navigation.listing_page == self.navigation.form_page {
            return Err(Error::ConfigValidation {
                message: format!(
                    "listing_page and form_page must differ (both are '{}')",
                    self.navigation.listing_page
                ),
            });
        }

        if regex::Regex::new(&self.validation.national_id_pattern).is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "invalid regex pattern: {}",
                    self.validation.national_id_pattern
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

/// Map `DISPLAY_CONFIRM_DELETE` to `display.confirm_delete`.
///
/// Only the section name is split off, so field names keep their
/// underscores.
fn section_key(key: &UncasedStr) -> Uncased<'_> {
    let key = key.as_str().to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}").into();
        }
    }
    key.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.key, "appointments");
        assert!(config.validation.case_insensitive);
        assert_eq!(config.navigation.edit_param, "editId");
        assert_eq!(config.display.empty_placeholder, "no data");
        assert!(config.display.confirm_delete);
    }

    #[test]
    fn test_default_validation_config_uses_builtin_pattern() {
        let validation = ValidationConfig::default();
        assert_eq!(validation.national_id_pattern, NATIONAL_ID_PATTERN);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage key"));
    }

    #[test]
    fn test_validate_empty_edit_param() {
        let mut config = Config::default();
        config.navigation.edit_param = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("edit_param"));
    }

    #[test]
    fn test_validate_same_pages() {
        let mut config = Config::default();
        config.navigation.form_page = config.navigation.listing_page.clone();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must differ"));
    }

    #[test]
    fn test_validate_invalid_regex() {
        let mut config = Config::default();
        config.validation.national_id_pattern = "[invalid".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid regex"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("appointments.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("apptbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "apptbook_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\nkey = \"citas\"\n\n[display]\nempty_placeholder = \"nothing\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.key, "citas");
        assert_eq!(config.display.empty_placeholder, "nothing");
        assert_eq!(config.navigation, NavigationConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_from_toml_file_all_sections() {
        let path = std::env::temp_dir().join(format!(
            "apptbook_config_sections_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\ndatabase_path = \"/tmp/citas.db\"\n\n\
             [validation]\ncase_insensitive = false\n\n\
             [navigation]\nedit_param = \"id\"\n\n\
             [display]\nconfirm_delete = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/citas.db"));
        assert!(!config.validation.case_insensitive);
        assert_eq!(config.navigation.edit_param, "id");
        assert!(!config.display.confirm_delete);
        assert_eq!(config.storage.key, "appointments");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_section_key_keeps_field_underscores() {
        let cases = [
            ("DISPLAY_CONFIRM_DELETE", "display.confirm_delete"),
            ("display_empty_placeholder", "display.empty_placeholder"),
            ("STORAGE_DATABASE_PATH", "storage.database_path"),
            ("STORAGE_KEY", "storage.key"),
            ("VALIDATION_NATIONAL_ID_PATTERN", "validation.national_id_pattern"),
            ("NAVIGATION_EDIT_PARAM", "navigation.edit_param"),
            ("UNKNOWN_THING", "unknown_thing"),
        ];
        for (input, expected) in cases {
            assert_eq!(section_key(UncasedStr::new(input)).as_str(), expected);
        }
    }

    #[test]
    fn test_env_overrides_multi_word_keys() {
        // A prefix of its own keeps this test clear of any real APPTBOOK_ vars.
        let prefix = format!("APPTBOOK_ENVTEST{}_", std::process::id());
        let vars = [
            ("STORAGE_KEY", "citas"),
            ("DISPLAY_CONFIRM_DELETE", "false"),
            ("DISPLAY_EMPTY_PLACEHOLDER", "vacio"),
            ("NAVIGATION_EDIT_PARAM", "id"),
        ];
        for (name, value) in vars {
            std::env::set_var(format!("{prefix}{name}"), value);
        }

        let config = Config::extract(Path::new("/nonexistent/config.toml"), &prefix);

        for (name, _) in vars {
            std::env::remove_var(format!("{prefix}{name}"));
        }

        let config = config.unwrap();
        assert_eq!(config.storage.key, "citas");
        assert!(!config.display.confirm_delete);
        assert_eq!(config.display.empty_placeholder, "vacio");
        assert_eq!(config.navigation.edit_param, "id");
    }

    #[test]
    fn test_navigation_config_deserialize() {
        let json = r#"{"listing_page": "list.html", "edit_param": "id"}"#;
        let nav: NavigationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(nav.listing_page, "list.html");
        assert_eq!(nav.form_page, "appointment-form.html");
        assert_eq!(nav.edit_param, "id");
    }
}
