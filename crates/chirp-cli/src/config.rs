use std::path::PathBuf;

use anyhow::{Result, bail};

use chirp_store::Backend;
use chirp_types::FingerprintScheme;

pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_DB_PATH: &str = "chirp.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub scheme: FingerprintScheme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults; unknown
    /// values are an error rather than a silent fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = lookup("CHIRP_STORE").unwrap_or_else(|| "json".into());
        let backend = match store.trim().to_ascii_lowercase().as_str() {
            "json" => Backend::Json {
                dir: lookup("CHIRP_DATA_DIR")
                    .unwrap_or_else(|| DEFAULT_DATA_DIR.into())
                    .into(),
            },
            "sqlite" => Backend::Sqlite {
                path: PathBuf::from(
                    lookup("CHIRP_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
                ),
            },
            other => bail!("CHIRP_STORE must be 'json' or 'sqlite', got '{}'", other),
        };

        let scheme = match lookup("CHIRP_FINGERPRINT") {
            Some(value) => value.parse::<FingerprintScheme>().map_err(anyhow::Error::msg)?,
            None => FingerprintScheme::default(),
        };

        Ok(Self { backend, scheme })
    }
}
