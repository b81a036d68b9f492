use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroovyscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Type name must not be empty")]
    EmptyTypeName,
    #[error("Least upper bound requires at least one type")]
    EmptyLubInput,
    #[error("Cannot promote boolean together with {0}")]
    BooleanPromotion(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GroovyscopeError>;
