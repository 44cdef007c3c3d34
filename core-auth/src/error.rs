use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to encode token segment: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
