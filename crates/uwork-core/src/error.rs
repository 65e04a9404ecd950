use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or empty required fields on create/update.
    #[error("{0}")]
    Validation(String),

    /// A status filter or status field outside {planned, completed}.
    #[error("Invalid status")]
    InvalidStatus(String),

    /// An axis tag outside the fixed four-tag enumeration.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    #[error("Item not found")]
    ItemNotFound(i64),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
