use std::io::{self, Write};
use std::sync::Mutex;

use log::warn;

use crate::model::RecipeRecord;
use crate::session::Page;

/// What a page shows, borrowed from the dataset and session
#[derive(Debug)]
pub enum View<'a> {
    List {
        names: Vec<&'a str>,
    },
    Viewer {
        recipe: Option<&'a RecipeRecord>,
        image_url: &'a str,
        is_favorite: bool,
    },
    Favorites {
        names: &'a [String],
    },
    Add,
}

/// Everything handed to a renderer for one pass
#[derive(Debug)]
pub struct Screen<'a> {
    pub page: Page,
    pub view: View<'a>,
    /// Problem loading the dataset, shown above the page
    pub notice: Option<&'a str>,
}

/// Presents a screen to the user
pub trait Render: Send + Sync {
    fn render(&self, screen: &Screen<'_>);
}

/// Writes screens as plain text
pub struct TextRenderer<W: Write> {
    out: Mutex<W>,
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_screen(out: &mut W, screen: &Screen<'_>) -> io::Result<()> {
        writeln!(out, "== {} ==", screen.page.title())?;
        if let Some(notice) = screen.notice {
            writeln!(out, "! {}", notice)?;
        }

        match &screen.view {
            View::List { names } => {
                for name in names {
                    writeln!(out, "- {}", name)?;
                }
            }
            View::Viewer {
                recipe: None, ..
            } => writeln!(out, "No recipes available.")?,
            View::Viewer {
                recipe: Some(recipe),
                image_url,
                is_favorite,
            } => write_recipe(out, recipe, image_url, *is_favorite)?,
            View::Favorites { names } if names.is_empty() => {
                writeln!(out, "No favorites added yet.")?
            }
            View::Favorites { names } => {
                for name in names.iter() {
                    writeln!(out, "* {}", name)?;
                }
            }
            View::Add => writeln!(out, "Enter the new recipe's details.")?,
        }
        writeln!(out)
    }
}

impl<W: Write + Send> Render for TextRenderer<W> {
    fn render(&self, screen: &Screen<'_>) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = Self::write_screen(&mut out, screen) {
            warn!("Failed to render {} page: {}", screen.page.title(), e);
        }
    }
}

fn write_recipe<W: Write>(
    out: &mut W,
    recipe: &RecipeRecord,
    image_url: &str,
    is_favorite: bool,
) -> io::Result<()> {
    writeln!(out, "{}", recipe.name)?;
    if !recipe.subtitle.is_empty() {
        writeln!(out, "{}", recipe.subtitle)?;
    }
    writeln!(out, "Image: {}", image_url)?;
    writeln!(out, "{} Calories", recipe.calories)?;
    writeln!(
        out,
        "Prep Time: {} minutes | Cook Time: {} minutes",
        recipe.prep_time_minutes, recipe.cook_time_minutes
    )?;

    let mut badges = Vec::new();
    if recipe.dairy_free {
        badges.push("Dairy-Free");
    }
    if recipe.is_low_calorie() {
        badges.push("Low Calorie");
    }
    if recipe.vegetarian {
        badges.push("Vegetarian");
    }
    if !badges.is_empty() {
        writeln!(out, "[{}]", badges.join("] ["))?;
    }

    if !recipe.bio.is_empty() {
        writeln!(out, "\n{}", recipe.bio)?;
    }

    writeln!(out, "\nIngredients:")?;
    for item in &recipe.ingredients {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out, "\nBust Out List:")?;
    for item in &recipe.bust_out_list {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out, "\nInstructions:")?;
    for (step, text) in recipe.numbered_steps() {
        writeln!(out, "Step {}: {}", step, text)?;
    }

    writeln!(
        out,
        "\n({})",
        if is_favorite {
            "in favorites"
        } else {
            "not in favorites"
        }
    )
}
