use async_trait::async_trait;
use log::{debug, info};
use sqlx::{Connection, SqliteConnection};

use super::RecipeSink;
use crate::error::RecipeError;
use crate::model::{join_list, BoolEncoding, RecipeRecord, RECIPE_COLUMNS};
use crate::sources::sql::{close, connect, quote_ident};

/// Inserts submissions into a database table, one transaction per record
pub struct SqlSink {
    database_url: String,
    table: String,
    encoding: BoolEncoding,
}

impl SqlSink {
    pub fn new(
        database_url: impl Into<String>,
        table: impl Into<String>,
        encoding: BoolEncoding,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            table: table.into(),
            encoding,
        }
    }

    fn insert_statement(&self) -> String {
        let columns: Vec<String> = RECIPE_COLUMNS.iter().map(|c| quote_ident(c)).collect();
        let params: Vec<String> = (1..=RECIPE_COLUMNS.len()).map(|n| format!("?{}", n)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.table),
            columns.join(", "),
            params.join(", ")
        )
    }

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        record: &RecipeRecord,
    ) -> Result<(), RecipeError> {
        let sql = self.insert_statement();
        debug!("Running: {}", sql);

        let mut tx = conn.begin().await.map_err(persist_error)?;

        let query = sqlx::query(&sql)
            .bind(record.name.as_str())
            .bind(record.subtitle.as_str())
            .bind(record.calories)
            .bind(record.prep_time_minutes)
            .bind(record.cook_time_minutes)
            .bind(record.bio.as_str())
            .bind(join_list(&record.bust_out_list))
            .bind(join_list(&record.ingredients))
            .bind(join_list(&record.instructions))
            .bind(record.image_url.as_deref());
        let query = match self.encoding {
            BoolEncoding::Native => query.bind(record.dairy_free).bind(record.vegetarian),
            BoolEncoding::YesNo => query
                .bind(self.encoding.encode(record.dairy_free))
                .bind(self.encoding.encode(record.vegetarian)),
        };

        query.execute(&mut *tx).await.map_err(persist_error)?;
        tx.commit().await.map_err(persist_error)?;
        Ok(())
    }
}

#[async_trait]
impl RecipeSink for SqlSink {
    fn sink_name(&self) -> &str {
        "sql"
    }

    async fn append(&self, record: &RecipeRecord) -> Result<(), RecipeError> {
        let mut conn = connect(&self.database_url).await?;
        let result = self.insert(&mut conn, record).await;
        close(conn).await;

        result?;
        info!("Inserted '{}' into table '{}'", record.name, self.table);
        Ok(())
    }
}

fn persist_error(e: sqlx::Error) -> RecipeError {
    RecipeError::PersistError(e.to_string())
}
