use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of hex characters kept from the full digest.
pub const FINGERPRINT_HEX_LEN: usize = 12;

/// Stored in place of a fingerprint when the digest could not be computed.
pub const HASH_ERROR_SENTINEL: &str = "HASH_ERR";

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("digest unavailable: {0}")]
    DigestUnavailable(String),

    #[error("digest output too short: {len} hex chars")]
    ShortDigest { len: usize },
}

/// Hex digest over raw bytes. Implementations must be deterministic.
pub trait ContentDigest {
    fn hex_digest(&self, input: &[u8]) -> Result<String, FingerprintError>;
}

/// SHA-256 rendered as lowercase hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn hex_digest(&self, input: &[u8]) -> Result<String, FingerprintError> {
        let mut hasher = Sha256::new();
        hasher.update(input);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// The fields a fingerprint is derived from, in concatenation order.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
    pub id: &'a str,
    pub recipient_cell: &'a str,
    pub body: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

impl FingerprintInput<'_> {
    fn concatenated(&self) -> String {
        [self.id, self.recipient_cell, self.body, self.date, self.time].concat()
    }
}

/// First 12 hex chars of the digest over `id ‖ recipient ‖ body ‖ date ‖ time`.
pub fn digest_fingerprint<D: ContentDigest + ?Sized>(
    digest: &D,
    input: &FingerprintInput<'_>,
) -> Result<String, FingerprintError> {
    let hex = digest.hex_digest(input.concatenated().as_bytes())?;
    hex.get(..FINGERPRINT_HEX_LEN)
        .map(str::to_owned)
        .ok_or(FingerprintError::ShortDigest { len: hex.len() })
}

/// `"XX:YZ"` display shorthand: the first two characters of the ID, a colon,
/// then the uppercased first and last characters of the body. Bodies of two
/// characters or fewer are uppercased whole, so `"x"` gives `"X"` and an
/// empty body gives nothing after the colon.
///
/// This is not collision resistant and must never be used as a key.
pub fn shorthand_fingerprint(id: &str, body: &str) -> String {
    let prefix: String = id.chars().take(2).collect();

    let excerpt = if body.chars().count() <= 2 {
        body.to_uppercase()
    } else {
        let mut chars = body.chars();
        // Both exist: the body has at least three characters.
        let first = chars.next().unwrap_or_default();
        let last = chars.next_back().unwrap_or_default();
        first.to_uppercase().chain(last.to_uppercase()).collect()
    };

    format!("{prefix}:{excerpt}")
}
