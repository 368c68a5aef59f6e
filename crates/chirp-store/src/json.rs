use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use chirp_types::{Account, DispatchRecord, FingerprintScheme};

use crate::{RecordStore, StoreError};

pub const USERS_FILE: &str = "users.json";
pub const MESSAGES_FILE: &str = "messages.json";
pub const META_FILE: &str = "store.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreMeta {
    fingerprint_scheme: FingerprintScheme,
}

/// Flat-file backend: one pretty-printed JSON array per entity list inside a
/// data directory.
///
/// Every operation opens, uses and closes its own file handles.
pub struct JsonStore {
    dir: PathBuf,
    scheme: FingerprintScheme,
}

impl JsonStore {
    /// Open (or create) a store directory and check its scheme tag.
    pub fn open(dir: &Path, scheme: FingerprintScheme) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let store = Self {
            dir: dir.to_path_buf(),
            scheme,
        };
        store.ensure_scheme()?;

        info!("JSON store opened at {} ({})", dir.display(), scheme);
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn ensure_scheme(&self) -> Result<(), StoreError> {
        let path = self.path(META_FILE);
        match read_document::<StoreMeta>(&path)? {
            Some(meta) if meta.fingerprint_scheme != self.scheme => Err(StoreError::SchemeMismatch {
                stored: meta.fingerprint_scheme,
                configured: self.scheme,
            }),
            Some(_) => Ok(()),
            None => {
                debug!("Tagging {} with scheme {}", self.dir.display(), self.scheme);
                write_document(
                    &path,
                    &StoreMeta {
                        fingerprint_scheme: self.scheme,
                    },
                )
            }
        }
    }

    /// Strict read: a missing file is an empty list, anything unreadable is
    /// an error.
    fn read_list<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        Ok(read_document::<Option<Vec<T>>>(&self.path(name))?
            .flatten()
            .unwrap_or_default())
    }

    fn load_list<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        self.read_list(name).unwrap_or_else(|e| {
            warn!("Treating {} as empty: {}", name, e);
            Vec::new()
        })
    }
}

impl RecordStore for JsonStore {
    fn fingerprint_scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    fn load_accounts(&self) -> Vec<Account> {
        self.load_list(USERS_FILE)
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        write_document(&self.path(USERS_FILE), accounts)
    }

    fn load_records(&self) -> Vec<DispatchRecord> {
        self.load_list(MESSAGES_FILE)
    }

    fn save_records(&self, records: &[DispatchRecord]) -> Result<(), StoreError> {
        write_document(&self.path(MESSAGES_FILE), records)
    }

    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        // A corrupt users file must not be replaced by a one-entry list.
        let mut accounts: Vec<Account> = self.read_list(USERS_FILE)?;
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::DuplicateUsername(account.username.clone()));
        }
        accounts.push(account.clone());
        self.save_accounts(&accounts)
    }

    fn insert_record(&self, record: &DispatchRecord) -> Result<(), StoreError> {
        let mut records: Vec<DispatchRecord> = self.read_list(MESSAGES_FILE)?;
        records.push(record.clone());
        self.save_records(&records)
    }
}

/// `Ok(None)` when the file does not exist or is blank.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Write to a sibling temp file, flush it to disk, then rename it over the
/// target.
fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    if let Err(source) = write_then_rename(&tmp, path, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}
