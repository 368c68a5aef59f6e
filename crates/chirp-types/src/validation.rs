//! Field validation for accounts and messages.
//!
//! Every predicate here is pure: no I/O, no clock, no randomness. The
//! `validate_*` wrappers return a [`ValidationError`] whose `Display` text is
//! the message shown to the user before re-prompting.

use thiserror::Error;

pub const MAX_USERNAME_CHARS: usize = 5;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_MESSAGE_CHARS: usize = 250;

/// Country code every cell number must start with.
pub const CELL_PREFIX: &str = "+27";

/// Punctuation accepted as the password's special character.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Username is not correctly formatted, please ensure that your username contains an \
         underscore and is no more than five characters in length."
    )]
    Username,

    #[error(
        "Password is not correctly formatted; please ensure that the password contains at least \
         eight characters, a capital letter, a number, and a special character."
    )]
    Password,

    /// Own cell number, captured at registration.
    #[error(
        "Cell number is incorrectly formatted or does not contain international code, please \
         correct the number and try again."
    )]
    CellNumber,

    /// Recipient cell number, captured when sending.
    #[error(
        "Cell phone number incorrectly formatted or does not contain international code. \
         Please correct the number and try again."
    )]
    RecipientCell,

    #[error("Message exceeds 250 characters, please reduce size.")]
    MessageBody,
}

pub fn is_valid_username(s: &str) -> bool {
    s.contains('_') && s.chars().count() <= MAX_USERNAME_CHARS
}

pub fn is_valid_password(s: &str) -> bool {
    s.chars().count() >= MIN_PASSWORD_CHARS
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// `^\+27\d{9,10}$` with ASCII digits only.
pub fn is_valid_cell_number(s: &str) -> bool {
    match s.strip_prefix(CELL_PREFIX) {
        Some(rest) => (9..=10).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

pub fn is_valid_message_body(s: &str) -> bool {
    s.chars().count() <= MAX_MESSAGE_CHARS
}

pub fn validate_username(s: &str) -> Result<(), ValidationError> {
    check(is_valid_username(s), ValidationError::Username)
}

pub fn validate_password(s: &str) -> Result<(), ValidationError> {
    check(is_valid_password(s), ValidationError::Password)
}

pub fn validate_cell_number(s: &str) -> Result<(), ValidationError> {
    check(is_valid_cell_number(s), ValidationError::CellNumber)
}

pub fn validate_recipient_cell(s: &str) -> Result<(), ValidationError> {
    check(is_valid_cell_number(s), ValidationError::RecipientCell)
}

pub fn validate_message_body(s: &str) -> Result<(), ValidationError> {
    check(is_valid_message_body(s), ValidationError::MessageBody)
}

fn check(ok: bool, err: ValidationError) -> Result<(), ValidationError> {
    if ok { Ok(()) } else { Err(err) }
}
