use chirp_types::{Account, DispatchRecord};

/// Database row types: these map directly to SQLite rows.
/// Converted to the chirp-types models at the query boundary.
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub cell: String,
}

pub struct MessageRow {
    pub id: String,
    pub recipient: String,
    pub message: String,
    pub hash: String,
    pub date: String,
    pub time: String,
}

impl From<UserRow> for Account {
    fn from(row: UserRow) -> Self {
        Account::new(row.username, row.password, row.cell)
    }
}

impl From<MessageRow> for DispatchRecord {
    fn from(row: MessageRow) -> Self {
        DispatchRecord::from_parts(row.id, row.recipient, row.message, row.hash, row.date, row.time)
    }
}
