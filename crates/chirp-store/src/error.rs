use std::path::PathBuf;

use chirp_types::FingerprintScheme;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corrupt store data in {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store uses fingerprint scheme {stored}, configured scheme is {configured}")]
    SchemeMismatch {
        stored: FingerprintScheme,
        configured: FingerprintScheme,
    },
}

impl StoreError {
    /// Failures that happened while reading existing data.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Corrupt { .. })
    }
}
