use async_trait::async_trait;
use log::info;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::{record_cells, RecipeSink};
use crate::error::RecipeError;
use crate::model::{BoolEncoding, RecipeRecord, RECIPE_COLUMNS};

/// Appends submissions to a local CSV file.
///
/// The header row is written only when the file is new or empty. A file
/// whose last row lacks a line break gets one before the new row. There is
/// no locking; concurrent writers can interleave rows.
pub struct CsvFileSink {
    path: PathBuf,
    encoding: BoolEncoding,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>, encoding: BoolEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }

    async fn tail(&self) -> Result<FileTail, RecipeError> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileTail::Empty),
            Err(e) => return Err(persist_error(&self.path, e)),
        };
        let len = file
            .metadata()
            .await
            .map_err(|e| persist_error(&self.path, e))?
            .len();
        if len == 0 {
            return Ok(FileTail::Empty);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .await
            .map_err(|e| persist_error(&self.path, e))?;
        file.read_exact(&mut last)
            .await
            .map_err(|e| persist_error(&self.path, e))?;

        Ok(if last[0] == b'\n' {
            FileTail::Complete
        } else {
            FileTail::Unterminated
        })
    }
}

/// How an existing file ends, which decides what goes before the new row
#[derive(Debug, PartialEq, Eq)]
enum FileTail {
    Empty,
    Complete,
    Unterminated,
}

#[async_trait]
impl RecipeSink for CsvFileSink {
    fn sink_name(&self) -> &str {
        "csv"
    }

    async fn append(&self, record: &RecipeRecord) -> Result<(), RecipeError> {
        let tail = self.tail().await?;

        let mut bytes = Vec::new();
        if tail == FileTail::Unterminated {
            bytes.push(b'\n');
        }
        let mut writer = csv::Writer::from_writer(bytes);
        if tail == FileTail::Empty {
            writer
                .write_record(RECIPE_COLUMNS)
                .map_err(|e| RecipeError::PersistError(e.to_string()))?;
        }
        writer
            .write_record(record_cells(record, self.encoding))
            .map_err(|e| RecipeError::PersistError(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| RecipeError::PersistError(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| persist_error(&self.path, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| persist_error(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| persist_error(&self.path, e))?;

        info!("Appended '{}' to {}", record.name, self.path.display());
        Ok(())
    }
}

fn persist_error(path: &Path, e: std::io::Error) -> RecipeError {
    RecipeError::PersistError(format!("{}: {}", path.display(), e))
}
