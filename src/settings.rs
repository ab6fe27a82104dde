use serde::Deserialize;

use crate::parser::ExtractOptions;

/// Optional settings file, looked up in the working directory.
const SETTINGS_FILE: &str = "bds_import";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Region written into every record; records carry none of their own.
    #[serde(default)]
    pub default_region: String,
    /// City used when a record has no city detail.
    #[serde(default)]
    pub default_city: String,
}

fn default_db_path() -> String {
    "data/projects.sqlite".to_string()
}

impl Settings {
    /// `bds_import.toml` (if present), then `BDS_*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(SETTINGS_FILE).required(false))
            .add_source(config::Environment::with_prefix("BDS"))
            .build()?
            .try_deserialize()
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            default_region: self.default_region.clone(),
            default_city: self.default_city.clone(),
        }
    }
}
