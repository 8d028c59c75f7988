use std::path::Path;

use crate::error::RecipeError;
use crate::image_url::image_data_url;
use crate::model::{split_list, RecipeRecord};

/// Image file types accepted by the submission form
pub const ACCEPTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image uploaded alongside a submission
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Raw values as entered in the "Add Recipe" form
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub subtitle: String,
    pub calories: String,
    pub prep_time: String,
    pub cook_time: String,
    pub bio: String,
    pub bust_out_list: String,
    pub ingredients: String,
    pub instructions: String,
    pub dairy_free: bool,
    pub vegetarian: bool,
    pub image: Option<UploadedImage>,
}

/// Turns form input into a canonical record.
///
/// Numbers must parse as non-negative integers or the submission is
/// rejected. List fields are split on commas and trimmed; blank items are
/// kept. Without an uploaded image the placeholder URL is used.
pub fn normalize(form: &SubmissionForm, placeholder: &str) -> Result<RecipeRecord, RecipeError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(RecipeError::ValidationError(
            "Recipe name cannot be empty".to_string(),
        ));
    }

    let image_url = match &form.image {
        Some(image) => {
            check_image_extension(&image.file_name)?;
            image_data_url(&image.bytes)
        }
        None => placeholder.to_string(),
    };

    Ok(RecipeRecord {
        name: name.to_string(),
        subtitle: form.subtitle.trim().to_string(),
        calories: parse_count(&form.calories, "Calories")?,
        prep_time_minutes: parse_count(&form.prep_time, "Prep Time")?,
        cook_time_minutes: parse_count(&form.cook_time, "Cook Time")?,
        bio: form.bio.trim().to_string(),
        bust_out_list: split_list(&form.bust_out_list),
        ingredients: split_list(&form.ingredients),
        instructions: split_list(&form.instructions),
        image_url: Some(image_url),
        dairy_free: form.dairy_free,
        vegetarian: form.vegetarian,
    })
}

fn parse_count(text: &str, field: &str) -> Result<u32, RecipeError> {
    text.trim().parse::<u32>().map_err(|_| {
        RecipeError::ValidationError(format!(
            "{} must be a whole number, got '{}'",
            field,
            text.trim()
        ))
    })
}

fn check_image_extension(file_name: &str) -> Result<(), RecipeError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ACCEPTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(RecipeError::ValidationError(format!(
            "Unsupported image type for '{}' (expected one of: {})",
            file_name,
            ACCEPTED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}
