use std::collections::BTreeSet;

use crate::error::RecipeError;

/// A loaded dataset before it is typed: header names plus string cells.
///
/// Both the CSV and SQL sources produce one of these so validation and
/// decoding work the same way regardless of where the data came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Checks that every required column is present.
///
/// On failure the error carries the missing column names, sorted.
pub fn validate(table: &Table, required: &[&str]) -> Result<(), RecipeError> {
    let present: BTreeSet<&str> = table.headers.iter().map(String::as_str).collect();
    let missing: BTreeSet<&str> = required
        .iter()
        .copied()
        .filter(|name| !present.contains(name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecipeError::MissingFields(
            missing.into_iter().map(str::to_string).collect(),
        ))
    }
}
