use async_trait::async_trait;
use log::{debug, info, warn};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Connection, Row, SqliteConnection};

use super::{records_from_table, RecipeSource};
use crate::error::RecipeError;
use crate::model::RecipeRecord;
use crate::schema::Table;

pub const DEFAULT_TABLE: &str = "recipes";
pub const DEFAULT_LIMIT: u32 = 40;

/// Reads recipes from a database table with a bounded `SELECT *`
pub struct SqlSource {
    database_url: String,
    table: String,
    limit: u32,
}

impl SqlSource {
    pub fn new(database_url: impl Into<String>, table: impl Into<String>, limit: u32) -> Self {
        Self {
            database_url: database_url.into(),
            table: table.into(),
            limit,
        }
    }

    async fn query_table(&self, conn: &mut SqliteConnection) -> Result<Table, RecipeError> {
        let sql = format!("SELECT * FROM {} LIMIT ?1", quote_ident(&self.table));
        debug!("Running: {}", sql);

        let rows = sqlx::query(&sql)
            .bind(i64::from(self.limit))
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| RecipeError::QueryError(e.to_string()))?;

        let headers = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect(),
            None => table_columns(conn, &self.table).await?,
        };

        let rows = rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|idx| cell_text(row, idx))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table { headers, rows })
    }
}

#[async_trait]
impl RecipeSource for SqlSource {
    fn source_name(&self) -> &str {
        "sql"
    }

    async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
        let mut conn = connect(&self.database_url).await?;
        let result = self.query_table(&mut conn).await;
        close(conn).await;

        let records = records_from_table(&result?)?;
        info!("Loaded {} recipes from table '{}'", records.len(), self.table);
        Ok(records)
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<SqliteConnection, RecipeError> {
    SqliteConnection::connect(database_url)
        .await
        .map_err(|e| RecipeError::ConnectionError(e.to_string()))
}

/// Closes the connection, logging rather than failing if that goes wrong.
pub(crate) async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// An empty result set carries no column names, so ask the schema instead.
async fn table_columns(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Vec<String>, RecipeError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| RecipeError::QueryError(e.to_string()))
}

/// Renders any SQLite value as text so rows decode like CSV cells.
fn cell_text(row: &SqliteRow, idx: usize) -> Result<Option<String>, RecipeError> {
    if let Ok(text) = row.try_get::<Option<String>, _>(idx) {
        return Ok(text);
    }
    if let Ok(int) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(int.map(|v| v.to_string()));
    }
    if let Ok(float) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(float.map(|v| v.to_string()));
    }
    row.try_get::<Option<bool>, _>(idx)
        .map(|flag| flag.map(|v| v.to_string()))
        .map_err(|e| RecipeError::QueryError(format!("column {}: {}", idx, e)))
}
