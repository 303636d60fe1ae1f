use std::{env, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::likes::DEFAULT_LIKES_KEY;
use crate::parse::UnitVocabulary;
use crate::search::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "https://forkify-api.herokuapp.com/api";
pub const DEFAULT_STORAGE_FILE: &str = "forkify-storage.json";

/// App settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub page_size: usize,
    pub storage_key: String,
    /// Where native builds keep their key-value file; unused in the browser
    pub storage_file: String,
    pub units: UnitVocabulary,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            storage_key: DEFAULT_LIKES_KEY.to_string(),
            storage_file: DEFAULT_STORAGE_FILE.to_string(),
            units: UnitVocabulary::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON config; a blank string means all defaults
    pub fn from_json(config_json: &str) -> Result<Self> {
        if config_json.trim().is_empty() {
            return Ok(Config::default());
        }
        let mut config: Config = serde_json::from_str(config_json)?;
        config.page_size = config.page_size.max(1);
        Ok(config)
    }

    /// Defaults overlaid with `FORKIFY_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            api_url: try_load("FORKIFY_API_URL", defaults.api_url),
            page_size: try_load("FORKIFY_PAGE_SIZE", defaults.page_size).max(1),
            storage_key: try_load("FORKIFY_STORAGE_KEY", defaults.storage_key),
            storage_file: try_load("FORKIFY_STORAGE_FILE", defaults.storage_file),
            log_level: try_load("FORKIFY_LOG", defaults.log_level),
            units: defaults.units,
        }
    }
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
