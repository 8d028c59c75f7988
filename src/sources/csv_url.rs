use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

use super::{records_from_table, RecipeSource};
use crate::error::RecipeError;
use crate::model::RecipeRecord;
use crate::schema::Table;

/// Reads recipes from a CSV document served over HTTP(S)
pub struct CsvSource {
    url: String,
    client: Client,
}

impl CsvSource {
    pub fn new(
        url: impl Into<String>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, RecipeError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl RecipeSource for CsvSource {
    fn source_name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
        debug!("Fetching recipe CSV from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecipeError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        let table = parse_csv_table(&body)?;
        let records = records_from_table(&table)?;
        info!("Loaded {} recipes from {}", records.len(), self.url);
        Ok(records)
    }
}

/// Parses delimited text, using the first row as column names.
///
/// Rows with a different number of fields than the header are a parse error.
pub fn parse_csv_table(text: &str) -> Result<Table, RecipeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| Some(cell.to_string())).collect());
    }

    Ok(Table { headers, rows })
}
