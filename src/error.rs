use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoopervalError {
    #[error("Store is not configured: {0}")]
    MissingConfig(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid document kind: {0}")]
    InvalidKind(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Delete not confirmed for: {0}")]
    DeleteNotConfirmed(String),

    #[error("Remote read failed: {0}")]
    RemoteRead(String),

    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    #[error("Asset upload failed: {0}")]
    RemoteUpload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoopervalError>;
