//! Register, log in, send and view messages on top of a [`RecordStore`].
//!
//! The session keeps the account and message lists in memory and treats them
//! as authoritative. Every change is written through to the store right away;
//! when a write fails the change stays in memory, the session is marked
//! dirty, and [`Session::flush`] retries with a full save.

pub mod auth;
pub mod error;
pub mod messages;

use tracing::{error, info};

use chirp_fingerprint::FingerprintGenerator;
use chirp_store::{RecordStore, StoreError};
use chirp_types::{Account, DispatchRecord};

pub use error::SessionError;

/// The in-memory effect of an operation, plus the store error if writing it
/// through failed.
#[derive(Debug)]
pub struct Recorded<T> {
    pub value: T,
    pub write_error: Option<StoreError>,
}

impl<T> Recorded<T> {
    pub fn is_persisted(&self) -> bool {
        self.write_error.is_none()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    accounts: bool,
    records: bool,
}

pub struct Session<S> {
    store: S,
    generator: FingerprintGenerator,
    accounts: Vec<Account>,
    records: Vec<DispatchRecord>,
    current: Option<Account>,
    sent_count: u64,
    dirty: Dirty,
}

impl<S: RecordStore> Session<S> {
    /// Load both lists from `store`. The fingerprint scheme follows the
    /// store's tag.
    pub fn open(store: S) -> Self {
        let generator = FingerprintGenerator::new(store.fingerprint_scheme());
        Self::with_generator(store, generator)
    }

    /// Like [`Session::open`] but with a seeded ID sequence.
    pub fn with_seed(store: S, seed: u64) -> Self {
        let generator = FingerprintGenerator::seeded(store.fingerprint_scheme(), seed);
        Self::with_generator(store, generator)
    }

    fn with_generator(store: S, generator: FingerprintGenerator) -> Self {
        let accounts = store.load_accounts();
        let records = store.load_records();
        info!(
            "Session started: {} accounts, {} messages",
            accounts.len(),
            records.len()
        );

        Self {
            store,
            generator,
            accounts,
            records,
            current: None,
            sent_count: 0,
            dirty: Dirty::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn current_user(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// Messages sent by this session. Starts at zero and is never persisted.
    pub fn sent_count(&self) -> u64 {
        self.sent_count
    }

    /// True when some change has not reached the store yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty.accounts || self.dirty.records
    }

    /// Save any list that failed to write through. Both lists are attempted
    /// even if the first fails; the first error is returned.
    pub fn flush(&mut self) -> Result<(), SessionError> {
        let mut first_err = None;

        if self.dirty.accounts {
            match self.store.save_accounts(&self.accounts) {
                Ok(()) => self.dirty.accounts = false,
                Err(e) => {
                    error!("Error saving users: {}", e);
                    first_err = first_err.or(Some(e));
                }
            }
        }

        if self.dirty.records {
            match self.store.save_records(&self.records) {
                Ok(()) => self.dirty.records = false,
                Err(e) => {
                    error!("Error saving messages: {}", e);
                    first_err = first_err.or(Some(e));
                }
            }
        }

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
