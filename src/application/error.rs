use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid category name: {0:?}")]
    InvalidCategoryName(String),

    #[error("Category already exists: {0}")]
    CategoryAlreadyExists(String),

    #[error("Please fill in all fields")]
    IncompleteForm { missing: Vec<&'static str> },

    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i64, supported: i64 },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
