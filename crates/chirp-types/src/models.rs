use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered user. Created once at registration and never mutated.
///
/// The password is kept verbatim; chirp does not hash credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub password: String,
    pub cell_number: String,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        cell_number: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            cell_number: cell_number.into(),
        }
    }
}

// Keep plaintext passwords out of logs and panic messages.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("cell_number", &self.cell_number)
            .finish()
    }
}

/// A sent message.
///
/// Fields are read-only: the fingerprint is derived from the other fields at
/// creation time and must never drift from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    #[serde(rename = "messageID")]
    id: String,
    #[serde(rename = "recipient")]
    recipient_cell: String,
    #[serde(rename = "messageText")]
    body: String,
    #[serde(rename = "messageHash")]
    fingerprint: String,
    date: String,
    time: String,
}

impl DispatchRecord {
    /// Assemble a record from already-derived parts.
    ///
    /// Used by the fingerprint generator for new records and by store
    /// backends when restoring persisted rows. Nothing else should build one.
    pub fn from_parts(
        id: String,
        recipient_cell: String,
        body: String,
        fingerprint: String,
        date: String,
        time: String,
    ) -> Self {
        Self {
            id,
            recipient_cell,
            body,
            fingerprint,
            date,
            time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn recipient_cell(&self) -> &str {
        &self.recipient_cell
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

/// How a store derives message fingerprints. A store is tagged with exactly
/// one scheme; the two formats are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintScheme {
    /// First 12 hex chars of SHA-256 over the message fields.
    #[default]
    Sha256,
    /// `"XX:YZ"` display shorthand. Collides freely.
    Shorthand,
}

impl FingerprintScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Shorthand => "shorthand",
        }
    }
}

impl fmt::Display for FingerprintScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FingerprintScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "shorthand" => Ok(Self::Shorthand),
            other => Err(format!("unknown fingerprint scheme: {other}")),
        }
    }
}
