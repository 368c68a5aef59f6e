//! Chirp message identity.
//!
//! Each sent message gets a random 10-digit ID and a short fingerprint
//! derived from its fields and capture time. Two fingerprint schemes exist:
//! a truncated SHA-256 digest and an `"XX:YZ"` display shorthand. A store
//! only ever holds one of them.

pub mod digest;
pub mod generator;
pub mod id;

pub use digest::{ContentDigest, FingerprintError, HASH_ERROR_SENTINEL, Sha256Digest};
pub use generator::FingerprintGenerator;
pub use id::generate_message_id;
