//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged on top of it, and the
//! result is deserialized and validated. Finally the `ECOALBUM_API_URL`
//! environment variable, when set, replaces the API base URL.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! base_url = "http://localhost:8000/api"  # Species API root
//! timeout_secs = 10                       # Per-request timeout
//!
//! [home]
//! featured_species = 3      # Flip cards in the "Especies Destacadas" grid
//! news_limit = 5            # Featured photos in the news carousel (max 20)
//! gallery_limit = 10        # Random photos in the gallery carousel (max 20)
//!
//! [carousel]
//! news_interval_ms = 5000   # Autoplay interval for the news carousel
//! transition_ms = 450       # Slide animation length
//!
//! [listing]
//! max_pages = 10            # Upper bound on species pages fetched per listing
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "ECOALBUM_API_URL";

/// Largest `limit` the gallery endpoints accept.
pub const MAX_GALLERY_LIMIT: u32 = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Species API access.
    pub api: ApiConfig,
    /// Home page feeds.
    pub home: HomeConfig,
    /// Carousel timing.
    pub carousel: CarouselConfig,
    /// Fauna/flora listing pages.
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Validation(format!("api.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "api.base_url must use http or https".into(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }
        for (key, value) in [
            ("home.news_limit", self.home.news_limit),
            ("home.gallery_limit", self.home.gallery_limit),
        ] {
            if value == 0 || value > MAX_GALLERY_LIMIT {
                return Err(ConfigError::Validation(format!(
                    "{key} must be 1-{MAX_GALLERY_LIMIT}"
                )));
            }
        }
        if self.carousel.news_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.news_interval_ms must be greater than 0".into(),
            ));
        }
        if self.carousel.transition_ms >= self.carousel.news_interval_ms {
            return Err(ConfigError::Validation(
                "carousel.transition_ms must be shorter than carousel.news_interval_ms".into(),
            ));
        }
        if self.listing.max_pages == 0 {
            return Err(ConfigError::Validation(
                "listing.max_pages must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Species API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Root URL every endpoint path is resolved against.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Home page feed sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    pub featured_species: usize,
    pub news_limit: u32,
    pub gallery_limit: u32,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            featured_species: 3,
            news_limit: 5,
            gallery_limit: 10,
        }
    }
}

/// Carousel timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Autoplay interval of the home news carousel, in milliseconds.
    pub news_interval_ms: u64,
    /// Length of one animated slide change, in milliseconds.
    pub transition_ms: u64,
}

impl CarouselConfig {
    pub fn news_interval(&self) -> Duration {
        Duration::from_millis(self.news_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            news_interval_ms: 5000,
            transition_ms: 450,
        }
    }
}

/// Listing page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Maximum number of paginated species requests per listing load.
    pub max_pages: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { max_pages: 10 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, apply environment
/// overrides, then deserialize and validate.
///
/// `env` is a lookup function so tests don't have to touch the process
/// environment.
pub fn resolve_config(
    overlay: Option<toml::Value>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: AppConfig = merged.try_into()?;
    if let Some(url) = env(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, honoring
/// `ECOALBUM_API_URL` from the process environment.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    resolve_config(overlay, |key| std::env::var(key).ok())
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# EcoAlbum Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# The ECOALBUM_API_URL environment variable overrides api.base_url.

# ---------------------------------------------------------------------------
# Species API
# ---------------------------------------------------------------------------
[api]
# Root URL every endpoint path is resolved against.
base_url = "http://localhost:8000/api"

# Per-request timeout in seconds.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Flip cards shown under "Especies Destacadas".
featured_species = 3

# Featured photos in the news carousel (1-20).
news_limit = 5

# Random photos in the gallery carousel (1-20).
gallery_limit = 10

# ---------------------------------------------------------------------------
# Carousels
# ---------------------------------------------------------------------------
[carousel]
# Autoplay interval of the news carousel, in milliseconds.
news_interval_ms = 5000

# Length of one animated slide change, in milliseconds.
# Must be shorter than the autoplay interval.
transition_ms = 450

# ---------------------------------------------------------------------------
# Listing pages
# ---------------------------------------------------------------------------
[listing]
# Upper bound on paginated species requests per listing load.
max_pages = 10
"##
}
