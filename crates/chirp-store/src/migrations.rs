use std::collections::HashSet;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use chirp_types::FingerprintScheme;

use crate::StoreError;
use crate::queries::OptionalExt;

const SCHEME_KEY: &str = "fingerprint_scheme";

/// Columns added after the first release. Tables created before them get
/// the column appended with an empty default.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("users", "cell", "TEXT NOT NULL DEFAULT ''"),
    ("messages", "hash", "TEXT NOT NULL DEFAULT ''"),
    ("messages", "date", "TEXT NOT NULL DEFAULT ''"),
    ("messages", "time", "TEXT NOT NULL DEFAULT ''"),
];

/// Idempotent schema bootstrap. Safe to run on every open.
pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            username    TEXT PRIMARY KEY,
            password    TEXT NOT NULL,
            cell        TEXT NOT NULL DEFAULT ''
        );

        -- Message IDs are random draws and may repeat; rowid keeps send order.
        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT NOT NULL,
            recipient   TEXT NOT NULL,
            message     TEXT NOT NULL,
            hash        TEXT NOT NULL DEFAULT '',
            date        TEXT NOT NULL DEFAULT '',
            time        TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_messages_id
            ON messages(id);

        CREATE TABLE IF NOT EXISTS store_meta (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL
        );
        ",
    )?;

    for (table, column, decl) in ADDITIVE_COLUMNS {
        if !table_columns(conn, table)?.contains(*column) {
            info!("Adding column {}.{}", table, column);
            conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl};"))?;
        }
    }

    info!("Database migrations complete");
    Ok(())
}

/// Tag an untagged store with `scheme`, or check an existing tag against it.
pub fn ensure_scheme(
    conn: &Connection,
    path: &Path,
    scheme: FingerprintScheme,
) -> Result<(), StoreError> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = ?1",
            [SCHEME_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        None => {
            conn.execute(
                "INSERT INTO store_meta (key, value) VALUES (?1, ?2)",
                [SCHEME_KEY, scheme.as_str()],
            )?;
            Ok(())
        }
        Some(value) => {
            let stored: FingerprintScheme =
                value.parse().map_err(|reason| StoreError::Corrupt {
                    path: path.to_path_buf(),
                    reason,
                })?;
            if stored == scheme {
                Ok(())
            } else {
                Err(StoreError::SchemeMismatch {
                    stored,
                    configured: scheme,
                })
            }
        }
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(names)
}
