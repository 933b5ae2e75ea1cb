use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwdocsError {
    #[error("Invalid document: {0}")]
    Validation(String),

    #[error("A document named '{0}' already exists")]
    DuplicateName(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage busy: no write slot within {0:?}")]
    WriteTimeout(Duration),

    #[error("Corrupt sections data: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl SwdocsError {
    /// Errors caused by contention or the engine rather than by the request.
    pub fn is_storage(&self) -> bool {
        matches!(self, SwdocsError::Storage(_) | SwdocsError::WriteTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, SwdocsError>;
