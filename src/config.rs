use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::image_url::DEFAULT_PLACEHOLDER_IMAGE;
use crate::model::BoolEncoding;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Where recipes are read from
    #[serde(default)]
    pub source: SourceConfig,
    /// Where submitted recipes are written
    #[serde(default)]
    pub sink: SinkConfig,
    /// Image shown when a recipe has no valid image URL
    #[serde(default = "default_placeholder_image_url")]
    pub placeholder_image_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            sink: SinkConfig::default(),
            placeholder_image_url: default_placeholder_image_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Configuration for the recipe data source
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// "csv" or "sql"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// URL of the recipe CSV (csv backend)
    #[serde(default = "default_csv_url")]
    pub csv_url: String,
    /// Connection string, credentials included (sql backend)
    pub database_url: Option<String>,
    /// Table to read from (sql backend)
    #[serde(default = "default_table")]
    pub table: String,
    /// Maximum rows to read (sql backend)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            csv_url: default_csv_url(),
            database_url: None,
            table: default_table(),
            limit: default_limit(),
        }
    }
}

/// Configuration for where submissions are stored
#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    /// "csv" or "sql"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// File submissions are appended to (csv backend)
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// Connection string, credentials included (sql backend)
    pub database_url: Option<String>,
    /// Table to insert into (sql backend)
    #[serde(default = "default_table")]
    pub table: String,
    /// How boolean flags are stored
    #[serde(default)]
    pub bool_encoding: BoolEncoding,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            csv_path: default_csv_path(),
            database_url: None,
            table: default_table(),
            bool_encoding: BoolEncoding::default(),
        }
    }
}

// Default value functions
fn default_backend() -> String {
    "csv".to_string()
}

fn default_csv_url() -> String {
    "https://raw.githubusercontent.com/ajthebear/family-recipes/ed0d8ed220cdd9512c84c5432dfe1d1e39caf831/Family_Recipe_Viewer_Cleaned_v5.csv".to_string()
}

fn default_csv_path() -> String {
    "submitted_recipes.csv".to_string()
}

fn default_table() -> String {
    crate::sources::DEFAULT_TABLE.to_string()
}

fn default_limit() -> u32 {
    crate::sources::DEFAULT_LIMIT
}

fn default_placeholder_image_url() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; FamilyRecipes/1.0)".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__SOURCE__DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPES__SINK__CSV_PATH
        .add_source(
            Environment::with_prefix("RECIPES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
