use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate slug in catalog: {0}")]
    DuplicateSlug(String),

    #[error("Failed to parse catalog config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
