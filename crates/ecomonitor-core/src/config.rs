use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding `services.api_base_url`
pub const ENV_BASE_URL: &str = "ECOMONITOR_BASE_URL";
/// Environment variable overriding `location.latitude`
pub const ENV_LATITUDE: &str = "ECOMONITOR_LAT";
/// Environment variable overriding `location.longitude`
pub const ENV_LONGITUDE: &str = "ECOMONITOR_LON";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Every section and every key is optional; missing ones take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote endpoints
    pub services: ServiceConfig,

    /// City search tuning
    pub autocomplete: AutocompleteConfig,

    /// Display preferences
    pub ui: UiConfig,

    /// Desktop stand-in for the device location provider
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the environment/places backend
    pub api_base_url: String,

    /// Base URL of the Nominatim-compatible reverse geocoder
    pub geocoder_url: String,

    /// User-Agent sent to the geocoder (its usage policy requires one)
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            geocoder_url: default_geocoder_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("EcoMonitor/{} (desktop)", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Quiet interval before a typed query is dispatched
    pub debounce_ms: u64,

    /// Maximum number of cached query results
    pub cache_capacity: usize,

    /// Queries shorter than this (after trimming) are ignored
    pub min_query_chars: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 350,
            cache_capacity: 16,
            min_query_chars: 3,
        }
    }
}

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    /// The other language; the screen only offers a two-way toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Pt,
            Self::Pt => Self::En,
        }
    }

    /// Parse a language tag such as `pt-BR` or `en`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        if tag.starts_with("pt") {
            Some(Self::Pt)
        } else if tag.starts_with("en") {
            Some(Self::En)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: Language,

    /// Show the raw JSON panel under the dashboard
    pub show_raw: bool,

    /// Coordinate the screen starts with
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            show_raw: false,
            default_latitude: -23.55,
            default_longitude: -46.64,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// Both halves of the fixed coordinate, if configured
    pub fn fixed(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists. Environment overrides are applied last.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    ///
    /// A missing file yields defaults; nothing is written.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", path.display(), e.message()))
        })?;

        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    /// Unparseable coordinates are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            tracing::info!("Using API base URL from {}", ENV_BASE_URL);
            self.services.api_base_url = url;
        }

        for (key, slot) in [
            (ENV_LATITUDE, &mut self.location.latitude),
            (ENV_LONGITUDE, &mut self.location.longitude),
        ] {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<f64>() {
                    Ok(v) => *slot = Some(v),
                    Err(e) => tracing::warn!("Ignoring {}={:?}: {}", key, raw, e),
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.services.api_base_url,
            "services.api_base_url",
            &mut result,
        );
        self.validate_url(
            &self.services.geocoder_url,
            "services.geocoder_url",
            &mut result,
        );

        if self.services.user_agent.trim().is_empty() {
            result.add_error(
                "services.user_agent",
                "A User-Agent is required by the reverse geocoder",
            );
        }

        if self.autocomplete.cache_capacity == 0 {
            result.add_error(
                "autocomplete.cache_capacity",
                "Cache capacity must be greater than 0",
            );
        }

        if self.autocomplete.debounce_ms == 0 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce disabled (0 ms) - every keystroke hits the backend",
            );
        } else if self.autocomplete.debounce_ms > 5000 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce interval is unusually long (>5s)",
            );
        }

        if self.autocomplete.min_query_chars == 0 {
            result.add_warning(
                "autocomplete.min_query_chars",
                "Empty queries will be sent to the backend",
            );
        }

        validate_coordinate(
            self.ui.default_latitude,
            self.ui.default_longitude,
            "ui.default",
            &mut result,
        );

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => validate_coordinate(lat, lon, "location", &mut result),
            (None, None) => {}
            _ => result.add_warning(
                "location",
                "Only one of latitude/longitude is set - location detection disabled",
            ),
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to an explicit file path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, self.to_toml()?).context("Failed to write config file")?;

        Ok(())
    }

    /// Render as the TOML written by `save`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("ecomonitor");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_coordinate(lat: f64, lon: f64, prefix: &str, result: &mut ValidationResult) {
    if !(-90.0..=90.0).contains(&lat) {
        result.add_error(
            format!("{}.latitude", prefix),
            format!("Latitude out of range: {}", lat),
        );
    }
    if !(-180.0..=180.0).contains(&lon) {
        result.add_error(
            format!("{}.longitude", prefix),
            format!("Longitude out of range: {}", lon),
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_autocomplete_defaults() {
        let config = Config::default();
        assert_eq!(config.autocomplete.debounce_ms, 350);
        assert_eq!(config.autocomplete.cache_capacity, 16);
        assert_eq!(config.autocomplete.min_query_chars, 3);
        assert_eq!(config.ui.default_latitude, -23.55);
        assert_eq!(config.ui.default_longitude, -46.64);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.services.api_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "services.api_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.services.geocoder_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_cache_capacity_is_error() {
        let mut config = Config::default();
        config.autocomplete.cache_capacity = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "autocomplete.cache_capacity"));
    }

    #[test]
    fn test_half_configured_location_is_warning() {
        let mut config = Config::default();
        config.location.latitude = Some(10.0);
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "location"));
        assert_eq!(config.location.fixed(), None);
    }

    #[test]
    fn test_out_of_range_latitude() {
        let mut config = Config::default();
        config.ui.default_latitude = 91.0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "ui.default.latitude"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_BASE_URL => Some("http://10.0.2.2:8000".to_string()),
            ENV_LATITUDE => Some(" -22.9 ".to_string()),
            ENV_LONGITUDE => Some("west".to_string()),
            _ => None,
        });
        assert_eq!(config.services.api_base_url, "http://10.0.2.2:8000");
        assert_eq!(config.location.latitude, Some(-22.9));
        assert_eq!(config.location.longitude, None);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.services.api_base_url, "http://localhost:8000");
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.ui.language = Language::Pt;
        config.location.latitude = Some(-25.43);
        config.location.longitude = Some(-49.27);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.language, Language::Pt);
        assert_eq!(loaded.location.fixed(), Some((-25.43, -49.27)));
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[services]\napi_base_url = \"http://192.168.0.205:8000\"\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.services.api_base_url, "http://192.168.0.205:8000");
        assert_eq!(loaded.services.geocoder_url, "https://nominatim.openstreetmap.org");
        assert_eq!(loaded.autocomplete.debounce_ms, 350);
    }

    #[test]
    fn test_partial_sections_fill_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlanguage = \"pt\"\n\n[autocomplete]\ndebounce_ms = 200\n")
            .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.language, Language::Pt);
        assert!(!loaded.ui.show_raw);
        assert_eq!(loaded.ui.default_latitude, -23.55);
        assert_eq!(loaded.autocomplete.debounce_ms, 200);
        assert_eq!(loaded.autocomplete.cache_capacity, 16);
        assert_eq!(loaded.services.api_base_url, "http://localhost:8000");
        assert!(loaded.validate().is_valid());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[services\napi_base_url = 1").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_language_toggle_and_tags() {
        assert_eq!(Language::En.toggled(), Language::Pt);
        assert_eq!(Language::Pt.toggled(), Language::En);
        assert_eq!(Language::from_tag("pt-BR"), Some(Language::Pt));
        assert_eq!(Language::from_tag("EN"), Some(Language::En));
        assert_eq!(Language::from_tag("fr"), None);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
