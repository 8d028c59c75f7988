use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::sinks::{CsvFileSink, RecipeSink, SqlSink};

pub struct SinkFactory;

impl SinkFactory {
    /// Create the configured submission sink
    pub fn create(config: &AppConfig) -> Result<Box<dyn RecipeSink>, RecipeError> {
        let sink = &config.sink;
        match sink.backend.as_str() {
            "csv" => Ok(Box::new(CsvFileSink::new(
                sink.csv_path.clone(),
                sink.bool_encoding,
            ))),
            "sql" => {
                let database_url = sink
                    .database_url
                    .clone()
                    .ok_or_else(|| RecipeError::ConfigMissing("sink.database_url".to_string()))?;
                Ok(Box::new(SqlSink::new(
                    database_url,
                    sink.table.clone(),
                    sink.bool_encoding,
                )))
            }
            other => Err(RecipeError::UnknownBackend {
                name: other.to_string(),
                available: Self::available_backends(),
            }),
        }
    }

    /// List all available sink backends
    pub fn available_backends() -> Vec<&'static str> {
        vec!["csv", "sql"]
    }
}
