/// Password Hashing and Verification
///
/// bcrypt with a per-call random salt embedded in the output, so hashing the
/// same password twice yields two different strings that both verify.
/// Password policy (length, character classes) belongs to the caller.

use bcrypt::{hash, verify};

use crate::error::CredentialError;

/// Lowest cost bcrypt accepts
pub const MIN_PASSWORD_COST: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_PASSWORD_COST: u32 = 31;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `HashingFailure` if bcrypt rejects the cost or the salt cannot be generated
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    hash(password, cost).map_err(|e| CredentialError::HashingFailure(e.to_string()))
}

/// Verify a password against a stored bcrypt hash
///
/// # Errors
/// - `CredentialMismatch` if the password does not match
/// - `HashingFailure` if the stored hash cannot be parsed
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), CredentialError> {
    match verify(password, password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CredentialError::CredentialMismatch),
        Err(e) => Err(CredentialError::HashingFailure(e.to_string())),
    }
}
