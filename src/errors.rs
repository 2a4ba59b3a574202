use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),

    #[error("Document not found: {0}")]
    NoSuchDocument(String),

    #[error("Invalid document ID: {0}")]
    InvalidDocumentId(String),

    #[error("WAL error: {0}")]
    WalError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DbError {
    /// Errors caused by the caller's input rather than by the store.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedQuery(_)
                | Self::Validation(_)
                | Self::InvalidDocumentId(_)
                | Self::Geocode(_)
                | Self::Json(_)
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchDocument(_))
    }
}
