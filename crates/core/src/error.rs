use crate::entry::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid vitals entry: {0}")]
    InvalidEntry(FieldErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}
