use thiserror::Error;

/// Errors that can occur while loading or storing recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Failed to fetch the recipe document
    #[error("Failed to fetch recipes: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The remote server answered with a non-success status
    #[error("Recipe source returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The fetched document is not well-formed tabular data
    #[error("Failed to parse recipes: {0}")]
    ParseError(String),

    /// Could not open a database connection
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// A database statement failed
    #[error("Database query failed: {0}")]
    QueryError(String),

    /// The dataset lacks required columns (sorted)
    #[error("Missing columns in recipe data: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Writing a submitted recipe failed
    #[error("Failed to save recipe: {0}")]
    PersistError(String),

    /// Submitted form data is malformed
    #[error("Invalid submission: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// A setting the selected backend needs was not provided
    #[error("Missing configuration value: {0}")]
    ConfigMissing(String),

    /// A backend name in the configuration is not known
    #[error("Unknown backend '{name}', expected one of: {}", .available.join(", "))]
    UnknownBackend {
        name: String,
        available: Vec<&'static str>,
    },
}

impl From<csv::Error> for RecipeError {
    fn from(err: csv::Error) -> Self {
        RecipeError::ParseError(err.to_string())
    }
}
