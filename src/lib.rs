//! Family recipe browser: loads recipes from a CSV file or a database table,
//! tracks per-session navigation and favorites, and stores new submissions.

pub mod app;
pub mod config;
pub mod error;
pub mod image_url;
pub mod model;
pub mod normalize;
pub mod render;
pub mod repository;
pub mod schema;
pub mod session;
pub mod sinks;
pub mod sources;

pub use app::{LogNotifier, Notifier, RecipeApp};
pub use config::AppConfig;
pub use error::RecipeError;
pub use image_url::is_valid_url;
pub use model::{BoolEncoding, RecipeRecord};
pub use normalize::{normalize, SubmissionForm, UploadedImage};
pub use render::{Render, Screen, TextRenderer, View};
pub use repository::{RecipeDataset, RecipeRepository};
pub use session::{Action, Page, ViewState};
pub use sinks::{RecipeSink, SinkFactory};
pub use sources::{RecipeSource, SourceFactory};

use std::sync::Arc;

/// Build an app from configuration: the configured source behind a
/// load-once repository, the configured sink, and log-only notifications.
pub fn build_app(config: &AppConfig) -> Result<RecipeApp, RecipeError> {
    let source = SourceFactory::create(config)?;
    let sink = SinkFactory::create(config)?;
    Ok(RecipeApp::new(
        Arc::new(RecipeRepository::new(source)),
        sink,
        Box::new(LogNotifier),
        config.placeholder_image_url.clone(),
    ))
}

/// Load configuration from `config.toml` / `RECIPES__*` and build the app
pub fn build_app_from_env() -> Result<RecipeApp, RecipeError> {
    let config = AppConfig::load()?;
    build_app(&config)
}
