mod csv_url;
mod factory;
pub(crate) mod sql;

pub use csv_url::{parse_csv_table, CsvSource};
pub use factory::SourceFactory;
pub use sql::{SqlSource, DEFAULT_LIMIT, DEFAULT_TABLE};

use async_trait::async_trait;
use log::warn;

use crate::error::RecipeError;
use crate::model::{
    parse_flag, split_list, RecipeRecord, COL_BIO, COL_BUST_OUT_LIST, COL_CALORIES,
    COL_COOK_TIME, COL_DAIRY_FREE, COL_IMAGE_URL, COL_INGREDIENTS, COL_INSTRUCTIONS, COL_NAME,
    COL_PREP_TIME, COL_SUBTITLE, COL_VEGETARIAN, RECIPE_COLUMNS,
};
use crate::schema::{self, Table};

/// Somewhere recipes can be read from
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short name used in log messages (e.g. "csv", "sql")
    fn source_name(&self) -> &str;

    /// Load every recipe the source offers
    async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError>;
}

/// Validates the columns of `table` and decodes each row.
///
/// Rows without a recipe name are skipped. Any other undecodable cell fails
/// the whole table; a dataset is never partially usable.
pub fn records_from_table(table: &Table) -> Result<Vec<RecipeRecord>, RecipeError> {
    schema::validate(table, &RECIPE_COLUMNS)?;

    let columns = ColumnIndexes::new(table)?;
    let mut records = Vec::with_capacity(table.rows.len());

    for (row_no, row) in table.rows.iter().enumerate() {
        let cells = RowCells {
            row,
            row_no: row_no + 1,
        };

        let name = cells.text(columns.name);
        if name.is_empty() {
            warn!("Skipping row {} without a recipe name", row_no + 1);
            continue;
        }

        records.push(RecipeRecord {
            name: name.to_string(),
            subtitle: cells.text(columns.subtitle).to_string(),
            calories: cells.number(columns.calories, COL_CALORIES)?,
            prep_time_minutes: cells.number(columns.prep_time, COL_PREP_TIME)?,
            cook_time_minutes: cells.number(columns.cook_time, COL_COOK_TIME)?,
            bio: cells.text(columns.bio).to_string(),
            bust_out_list: cells.list(columns.bust_out_list),
            ingredients: cells.list(columns.ingredients),
            instructions: cells.list(columns.instructions),
            image_url: cells.optional(columns.image_url),
            dairy_free: cells.flag(columns.dairy_free, COL_DAIRY_FREE)?,
            vegetarian: cells.flag(columns.vegetarian, COL_VEGETARIAN)?,
        });
    }

    Ok(records)
}

struct ColumnIndexes {
    name: usize,
    subtitle: usize,
    calories: usize,
    prep_time: usize,
    cook_time: usize,
    bio: usize,
    bust_out_list: usize,
    ingredients: usize,
    instructions: usize,
    image_url: usize,
    dairy_free: usize,
    vegetarian: usize,
}

impl ColumnIndexes {
    fn new(table: &Table) -> Result<Self, RecipeError> {
        let idx = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| RecipeError::MissingFields(vec![name.to_string()]))
        };
        Ok(Self {
            name: idx(COL_NAME)?,
            subtitle: idx(COL_SUBTITLE)?,
            calories: idx(COL_CALORIES)?,
            prep_time: idx(COL_PREP_TIME)?,
            cook_time: idx(COL_COOK_TIME)?,
            bio: idx(COL_BIO)?,
            bust_out_list: idx(COL_BUST_OUT_LIST)?,
            ingredients: idx(COL_INGREDIENTS)?,
            instructions: idx(COL_INSTRUCTIONS)?,
            image_url: idx(COL_IMAGE_URL)?,
            dairy_free: idx(COL_DAIRY_FREE)?,
            vegetarian: idx(COL_VEGETARIAN)?,
        })
    }
}

struct RowCells<'a> {
    row: &'a [Option<String>],
    row_no: usize,
}

impl<'a> RowCells<'a> {
    fn raw(&self, idx: usize) -> Option<&'a str> {
        self.row.get(idx).and_then(|cell| cell.as_deref())
    }

    fn text(&self, idx: usize) -> &'a str {
        self.raw(idx).map(str::trim).unwrap_or_default()
    }

    fn optional(&self, idx: usize) -> Option<String> {
        Some(self.text(idx))
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    fn list(&self, idx: usize) -> Vec<String> {
        self.raw(idx).map(split_list).unwrap_or_default()
    }

    /// Blank cells count as zero; whole-number floats like `450.0` are accepted.
    fn number(&self, idx: usize, column: &str) -> Result<u32, RecipeError> {
        let text = self.text(idx);
        if text.is_empty() {
            return Ok(0);
        }
        if let Ok(value) = text.parse::<u32>() {
            return Ok(value);
        }
        match text.parse::<f64>() {
            Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 => {
                Ok(value as u32)
            }
            _ => Err(RecipeError::ParseError(format!(
                "row {}: '{}' is not a valid {} value",
                self.row_no, text, column
            ))),
        }
    }

    fn flag(&self, idx: usize, column: &str) -> Result<bool, RecipeError> {
        let text = self.text(idx);
        parse_flag(text).ok_or_else(|| {
            RecipeError::ParseError(format!(
                "row {}: '{}' is not a valid {} flag",
                self.row_no, text, column
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn recipe_table(rows: Vec<Vec<Option<String>>>) -> Table {
        Table {
            headers: RECIPE_COLUMNS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    const PANCAKES: [&str; 12] = [
        "Pancakes",
        "with Maple Syrup",
        "450",
        "10",
        "15",
        "Sunday classic",
        "bowl, whisk",
        "flour, egg ,milk",
        "Mix everything, Fry in butter",
        "https://example.com/pancakes.jpg",
        "False",
        "True",
    ];

    #[test]
    fn test_decode_row() {
        let records = records_from_table(&recipe_table(vec![cells(&PANCAKES)])).unwrap();
        assert_eq!(records.len(), 1);

        let recipe = &records[0];
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.subtitle, "with Maple Syrup");
        assert_eq!(recipe.calories, 450);
        assert_eq!(recipe.prep_time_minutes, 10);
        assert_eq!(recipe.cook_time_minutes, 15);
        assert_eq!(recipe.bust_out_list, vec!["bowl", "whisk"]);
        assert_eq!(recipe.ingredients, vec!["flour", "egg", "milk"]);
        assert_eq!(recipe.instructions, vec!["Mix everything", "Fry in butter"]);
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://example.com/pancakes.jpg")
        );
        assert!(!recipe.dairy_free);
        assert!(recipe.vegetarian);
    }

    #[test]
    fn test_decode_columns_in_any_order() {
        let mut table = recipe_table(vec![cells(&PANCAKES)]);
        table.headers.reverse();
        table.rows[0].reverse();

        let records = records_from_table(&table).unwrap();
        assert_eq!(records[0].name, "Pancakes");
        assert_eq!(records[0].calories, 450);
    }

    #[test]
    fn test_float_numbers_and_yes_no_flags() {
        let mut row = PANCAKES;
        row[2] = "450.0";
        row[10] = "Yes";
        row[11] = "No";

        let records = records_from_table(&recipe_table(vec![cells(&row)])).unwrap();
        assert_eq!(records[0].calories, 450);
        assert!(records[0].dairy_free);
        assert!(!records[0].vegetarian);
    }

    #[test]
    fn test_blank_cells() {
        let mut row = cells(&PANCAKES);
        row[2] = None;
        row[9] = Some("  ".to_string());
        row[7] = None;

        let records = records_from_table(&recipe_table(vec![row])).unwrap();
        assert_eq!(records[0].calories, 0);
        assert_eq!(records[0].image_url, None);
        assert!(records[0].ingredients.is_empty());
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let mut nameless = PANCAKES;
        nameless[0] = "";

        let records =
            records_from_table(&recipe_table(vec![cells(&nameless), cells(&PANCAKES)])).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_bad_number_fails_whole_table() {
        let mut bad = PANCAKES;
        bad[3] = "ten";

        let result = records_from_table(&recipe_table(vec![cells(&PANCAKES), cells(&bad)]));
        match result {
            Err(RecipeError::ParseError(msg)) => {
                assert!(msg.contains("row 2"));
                assert!(msg.contains("Prep Time"));
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_column_indexes_require_every_column() {
        let mut table = recipe_table(Vec::new());
        table.headers.retain(|h| h != COL_IMAGE_URL);

        match ColumnIndexes::new(&table) {
            Err(RecipeError::MissingFields(missing)) => assert_eq!(missing, vec![COL_IMAGE_URL]),
            Err(e) => panic!("expected MissingFields, got {:?}", e),
            Ok(_) => panic!("expected an error"),
        }

        let table = recipe_table(Vec::new());
        let columns = ColumnIndexes::new(&table).unwrap();
        assert_eq!(columns.name, 0);
        assert_eq!(columns.vegetarian, 11);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let mut table = recipe_table(vec![cells(&PANCAKES)]);
        table.headers[11] = "Veggie".to_string();

        match records_from_table(&table) {
            Err(RecipeError::MissingFields(missing)) => assert_eq!(missing, vec!["Vegetarian"]),
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }
}
