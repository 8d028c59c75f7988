mod csv_file;
mod factory;
mod sql;

pub use csv_file::CsvFileSink;
pub use factory::SinkFactory;
pub use sql::SqlSink;

use async_trait::async_trait;

use crate::error::RecipeError;
use crate::model::{join_list, BoolEncoding, RecipeRecord};

/// Somewhere submitted recipes are stored
#[async_trait]
pub trait RecipeSink: Send + Sync {
    /// Short name used in log messages (e.g. "csv", "sql")
    fn sink_name(&self) -> &str;

    /// Store one record. Failures are reported, never retried.
    async fn append(&self, record: &RecipeRecord) -> Result<(), RecipeError>;
}

/// A record as text cells in column order, flags in the given encoding
pub(crate) fn record_cells(record: &RecipeRecord, encoding: BoolEncoding) -> [String; 12] {
    [
        record.name.clone(),
        record.subtitle.clone(),
        record.calories.to_string(),
        record.prep_time_minutes.to_string(),
        record.cook_time_minutes.to_string(),
        record.bio.clone(),
        join_list(&record.bust_out_list),
        join_list(&record.ingredients),
        join_list(&record.instructions),
        record.image_url.clone().unwrap_or_default(),
        encoding.encode(record.dairy_free).to_string(),
        encoding.encode(record.vegetarian).to_string(),
    ]
}
