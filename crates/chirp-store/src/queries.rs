use rusqlite::Connection;
use tracing::warn;

use chirp_types::{Account, DispatchRecord, FingerprintScheme};

use crate::models::{MessageRow, UserRow};
use crate::{RecordStore, SqlStore, StoreError};

impl RecordStore for SqlStore {
    fn fingerprint_scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    // -- Users --

    fn load_accounts(&self) -> Vec<Account> {
        self.with_conn(|conn| query_users(conn))
            .unwrap_or_else(|e| {
                warn!("Treating users table as empty: {}", e);
                Vec::new()
            })
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM users", [])?;
            {
                let mut stmt =
                    tx.prepare("INSERT INTO users (username, password, cell) VALUES (?1, ?2, ?3)")?;
                for a in accounts {
                    stmt.execute((&a.username, &a.password, &a.cell_number))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;

            let existing: Option<String> = tx
                .query_row(
                    "SELECT username FROM users WHERE username = ?1",
                    [&account.username],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Err(StoreError::DuplicateUsername(account.username.clone()));
            }

            tx.execute(
                "INSERT INTO users (username, password, cell) VALUES (?1, ?2, ?3)",
                (&account.username, &account.password, &account.cell_number),
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    // -- Messages --

    fn load_records(&self) -> Vec<DispatchRecord> {
        self.with_conn(|conn| query_messages(conn))
            .unwrap_or_else(|e| {
                warn!("Treating messages table as empty: {}", e);
                Vec::new()
            })
    }

    fn save_records(&self, records: &[DispatchRecord]) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM messages", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO messages (id, recipient, message, hash, date, time)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for r in records {
                    stmt.execute(record_params(r))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn insert_record(&self, record: &DispatchRecord) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, recipient, message, hash, date, time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                record_params(record),
            )?;
            Ok(())
        })
    }
}

fn record_params(r: &DispatchRecord) -> [&str; 6] {
    [
        r.id(),
        r.recipient_cell(),
        r.body(),
        r.fingerprint(),
        r.date(),
        r.time(),
    ]
}

fn query_users(conn: &Connection) -> Result<Vec<Account>, StoreError> {
    let mut stmt = conn.prepare("SELECT username, password, cell FROM users ORDER BY rowid")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password: row.get(1)?,
                cell: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().map(Account::from).collect())
}

fn query_messages(conn: &Connection) -> Result<Vec<DispatchRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient, message, hash, date, time
         FROM messages
         ORDER BY rowid",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                recipient: row.get(1)?,
                message: row.get(2)?,
                hash: row.get(3)?,
                date: row.get(4)?,
                time: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().map(DispatchRecord::from).collect())
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, StoreError>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, StoreError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
