use chirp_types::{Account, DispatchRecord, FingerprintScheme};

use crate::StoreError;

/// Durable storage for accounts and sent messages.
///
/// Loads never fail: a missing or unreadable store reads as empty and the
/// problem is logged. Saves replace the whole persisted list in one step, so
/// a reader sees either the old list or the new one.
///
/// There is no cross-process locking. Two processes writing the same store
/// can lose each other's updates.
///
/// A SQLite `messages` table created elsewhere with `id` as its primary key
/// keeps that constraint: schema bootstrap only adds missing columns. On such
/// a database a repeated message ID makes `insert_record` fail with
/// [`StoreError::Sqlite`].
pub trait RecordStore {
    /// Scheme every fingerprint in this store was derived with.
    fn fingerprint_scheme(&self) -> FingerprintScheme;

    fn load_accounts(&self) -> Vec<Account>;

    fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError>;

    fn load_records(&self) -> Vec<DispatchRecord>;

    fn save_records(&self, records: &[DispatchRecord]) -> Result<(), StoreError>;

    /// Append one account. Fails with [`StoreError::DuplicateUsername`] and
    /// leaves the store untouched if the username is taken.
    fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Append one record. Message IDs carry no uniqueness constraint, except
    /// on a legacy SQLite table keyed by `id` (see above).
    fn insert_record(&self, record: &DispatchRecord) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn fingerprint_scheme(&self) -> FingerprintScheme {
        (**self).fingerprint_scheme()
    }

    fn load_accounts(&self) -> Vec<Account> {
        (**self).load_accounts()
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        (**self).save_accounts(accounts)
    }

    fn load_records(&self) -> Vec<DispatchRecord> {
        (**self).load_records()
    }

    fn save_records(&self, records: &[DispatchRecord]) -> Result<(), StoreError> {
        (**self).save_records(records)
    }

    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).insert_account(account)
    }

    fn insert_record(&self, record: &DispatchRecord) -> Result<(), StoreError> {
        (**self).insert_record(record)
    }
}
