use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

use chirp_types::{DispatchRecord, FingerprintScheme};

use crate::digest::{
    ContentDigest, FingerprintInput, HASH_ERROR_SENTINEL, Sha256Digest, digest_fingerprint,
    shorthand_fingerprint,
};
use crate::id::generate_message_id;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Turns a validated `(recipient, body)` pair into a [`DispatchRecord`].
///
/// Owns the RNG used for message IDs so tests can seed it. The scheme is
/// fixed for the generator's lifetime.
pub struct FingerprintGenerator<D = Sha256Digest> {
    scheme: FingerprintScheme,
    digest: D,
    rng: StdRng,
}

impl FingerprintGenerator {
    pub fn new(scheme: FingerprintScheme) -> Self {
        Self::with_digest(scheme, Sha256Digest, StdRng::from_os_rng())
    }

    /// Deterministic ID sequence, for tests and reproducible runs.
    pub fn seeded(scheme: FingerprintScheme, seed: u64) -> Self {
        Self::with_digest(scheme, Sha256Digest, StdRng::seed_from_u64(seed))
    }
}

impl<D: ContentDigest> FingerprintGenerator<D> {
    pub fn with_digest(scheme: FingerprintScheme, digest: D, rng: StdRng) -> Self {
        Self { scheme, digest, rng }
    }

    pub fn scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    /// Build a record captured at `captured_at` (local wall-clock time).
    ///
    /// Inputs are assumed to have passed validation already. The fingerprint
    /// is computed here, once; a digest failure yields the `HASH_ERR`
    /// sentinel instead of failing the send.
    pub fn stamp(
        &mut self,
        recipient_cell: &str,
        body: &str,
        captured_at: NaiveDateTime,
    ) -> DispatchRecord {
        let id = generate_message_id(&mut self.rng);
        let date = captured_at.format(DATE_FORMAT).to_string();
        let time = captured_at.format(TIME_FORMAT).to_string();

        let fingerprint = match self.scheme {
            FingerprintScheme::Sha256 => {
                let input = FingerprintInput {
                    id: &id,
                    recipient_cell,
                    body,
                    date: &date,
                    time: &time,
                };
                digest_fingerprint(&self.digest, &input).unwrap_or_else(|e| {
                    warn!("Fingerprint for message {} unavailable: {}", id, e);
                    HASH_ERROR_SENTINEL.to_string()
                })
            }
            FingerprintScheme::Shorthand => shorthand_fingerprint(&id, body),
        };

        DispatchRecord::from_parts(
            id,
            recipient_cell.to_string(),
            body.to_string(),
            fingerprint,
            date,
            time,
        )
    }
}
