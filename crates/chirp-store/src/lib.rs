pub mod error;
pub mod json;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::info;

use chirp_types::FingerprintScheme;

pub use error::StoreError;
pub use json::JsonStore;
pub use store::RecordStore;

/// SQLite backend.
///
/// Holds only the database path: each operation opens its own connection
/// and drops it when done, whatever the outcome.
pub struct SqlStore {
    path: PathBuf,
    scheme: FingerprintScheme,
}

impl SqlStore {
    /// Open the database, run the schema bootstrap and check the scheme tag.
    pub fn open(path: &Path, scheme: FingerprintScheme) -> Result<Self, StoreError> {
        let store = Self {
            path: path.to_path_buf(),
            scheme,
        };

        store.with_conn(|conn| {
            migrations::run(conn)?;
            migrations::ensure_scheme(conn, path, scheme)
        })?;

        info!("Database opened at {} ({})", path.display(), scheme);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let mut conn = Connection::open(&self.path)?;

        // WAL so a reader never sees a half-applied save
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        f(&mut conn)
    }
}

/// Which backend to open, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Json { dir: PathBuf },
    Sqlite { path: PathBuf },
}

impl Backend {
    pub fn open(&self, scheme: FingerprintScheme) -> Result<Box<dyn RecordStore>, StoreError> {
        let store: Box<dyn RecordStore> = match self {
            Self::Json { dir } => Box::new(JsonStore::open(dir, scheme)?),
            Self::Sqlite { path } => Box::new(SqlStore::open(path, scheme)?),
        };
        Ok(store)
    }
}
