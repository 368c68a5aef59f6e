//! Shared record shapes and field validation for chirp.

pub mod models;
pub mod validation;

pub use models::{Account, DispatchRecord, FingerprintScheme};
pub use validation::ValidationError;
