use chirp_store::StoreError;
use chirp_types::ValidationError;
use thiserror::Error;

/// Everything a workflow step can refuse. None of these is fatal; the front
/// end shows the message and re-prompts.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username already exists. Please choose another.")]
    DuplicateUsername(String),

    /// Deliberately does not say whether the username or the password was
    /// wrong.
    #[error("Username or password incorrect, please try again.")]
    InvalidCredentials,

    #[error("You must log in first.")]
    NotLoggedIn,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
