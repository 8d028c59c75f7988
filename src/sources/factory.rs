use std::time::Duration;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::sources::{CsvSource, RecipeSource, SqlSource};

pub struct SourceFactory;

impl SourceFactory {
    /// Create the configured recipe source
    pub fn create(config: &AppConfig) -> Result<Box<dyn RecipeSource>, RecipeError> {
        let source = &config.source;
        match source.backend.as_str() {
            "csv" => Ok(Box::new(CsvSource::new(
                source.csv_url.clone(),
                Some(Duration::from_secs(config.timeout)),
                &config.user_agent,
            )?)),
            "sql" => {
                let database_url = source.database_url.clone().ok_or_else(|| {
                    RecipeError::ConfigMissing("source.database_url".to_string())
                })?;
                Ok(Box::new(SqlSource::new(
                    database_url,
                    source.table.clone(),
                    source.limit,
                )))
            }
            other => Err(RecipeError::UnknownBackend {
                name: other.to_string(),
                available: Self::available_backends(),
            }),
        }
    }

    /// List all available source backends
    pub fn available_backends() -> Vec<&'static str> {
        vec!["csv", "sql"]
    }
}
