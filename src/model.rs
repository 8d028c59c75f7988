use serde::{Deserialize, Serialize};

use crate::image_url::resolve_image_url;

pub const COL_NAME: &str = "Recipe Name";
pub const COL_SUBTITLE: &str = "with Title";
pub const COL_CALORIES: &str = "Calories";
pub const COL_PREP_TIME: &str = "Prep Time";
pub const COL_COOK_TIME: &str = "Cook Time";
pub const COL_BIO: &str = "Recipe Bio";
pub const COL_BUST_OUT_LIST: &str = "Bust Out List";
pub const COL_INGREDIENTS: &str = "Ingredients";
pub const COL_INSTRUCTIONS: &str = "Instructions";
pub const COL_IMAGE_URL: &str = "Image URL";
pub const COL_DAIRY_FREE: &str = "Dairy-Free";
pub const COL_VEGETARIAN: &str = "Vegetarian";

/// Column names in storage order. Also the set every dataset must carry.
pub const RECIPE_COLUMNS: [&str; 12] = [
    COL_NAME,
    COL_SUBTITLE,
    COL_CALORIES,
    COL_PREP_TIME,
    COL_COOK_TIME,
    COL_BIO,
    COL_BUST_OUT_LIST,
    COL_INGREDIENTS,
    COL_INSTRUCTIONS,
    COL_IMAGE_URL,
    COL_DAIRY_FREE,
    COL_VEGETARIAN,
];

/// Recipes under this many calories get the "Low Calorie" badge.
pub const LOW_CALORIE_THRESHOLD: u32 = 670;

/// One row of the recipe dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeRecord {
    pub name: String,
    pub subtitle: String,
    pub calories: u32,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub bio: String,
    pub bust_out_list: Vec<String>,
    pub ingredients: Vec<String>,
    /// Order defines step numbering
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub dairy_free: bool,
    pub vegetarian: bool,
}

impl RecipeRecord {
    pub fn is_low_calorie(&self) -> bool {
        self.calories < LOW_CALORIE_THRESHOLD
    }

    /// The stored image URL when it is a well-formed absolute URL, otherwise `placeholder`.
    pub fn display_image_url<'a>(&'a self, placeholder: &'a str) -> &'a str {
        resolve_image_url(self.image_url.as_deref(), placeholder)
    }

    /// Instructions paired with their 1-based step number
    pub fn numbered_steps(&self) -> impl Iterator<Item = (usize, &str)> {
        self.instructions
            .iter()
            .enumerate()
            .map(|(idx, step)| (idx + 1, step.as_str()))
    }
}

/// How boolean flags are written to storage.
///
/// Records always hold native booleans; the encoding is applied at the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolEncoding {
    /// `True` / `False` in files, native booleans in the database
    #[default]
    Native,
    /// The literal strings `Yes` / `No`
    YesNo,
}

impl BoolEncoding {
    pub fn encode(&self, flag: bool) -> &'static str {
        match (self, flag) {
            (BoolEncoding::Native, true) => "True",
            (BoolEncoding::Native, false) => "False",
            (BoolEncoding::YesNo, true) => "Yes",
            (BoolEncoding::YesNo, false) => "No",
        }
    }
}

/// Reads a stored flag written in any of the encodings. Blank means false.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" => Some(true),
        "false" | "no" | "n" | "f" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Splits a comma-delimited field, trimming every item.
///
/// Empty items are kept, so `""` yields one empty item.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',').map(|item| item.trim().to_string()).collect()
}

/// Inverse of [`split_list`] for items without embedded commas
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}
