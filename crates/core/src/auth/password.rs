//! Account passwords.
//!
//! Passwords are stored as Argon2id PHC strings. Plaintext is checked
//! against [`MIN_PASSWORD_LEN`] before it is hashed.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Password failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The plaintext is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least 8 characters")]
    TooShort,

    /// Argon2 refused to hash.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Argon2 failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

fn argon2() -> Argon2<'static> {
    Argon2::default()
}

/// Rejects passwords shorter than [`MIN_PASSWORD_LEN`].
///
/// # Errors
///
/// `PasswordError::TooShort`.
pub fn check_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

/// Hashes a password with a fresh random salt.
///
/// ```
/// use cashora_core::auth::hash_password;
///
/// let stored = hash_password("opening-balance").unwrap();
/// assert!(stored.starts_with("$argon2id$"));
/// ```
///
/// # Errors
///
/// `PasswordError::HashError` if Argon2 fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks `password` against a stored PHC string. A mismatch is `Ok(false)`.
///
/// ```
/// use cashora_core::auth::{hash_password, verify_password};
///
/// let stored = hash_password("opening-balance").unwrap();
/// assert!(verify_password("opening-balance", &stored).unwrap());
/// assert!(!verify_password("closing-balance", &stored).unwrap());
/// ```
///
/// # Errors
///
/// `PasswordError::InvalidHash` for a malformed stored value,
/// `PasswordError::VerifyError` for any other Argon2 failure.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let phc = PasswordHash::new(stored).map_err(|_| PasswordError::InvalidHash)?;

    match argon2().verify_password(password.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("1234567", false)]
    #[case("12345678", true)]
    #[case("pässwörd", true)]
    fn test_check_strength(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(check_strength(password).is_ok(), ok);
    }

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("deposit-200").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("deposit-200", &stored).unwrap());
        assert!(!verify_password("deposit-201", &stored).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same-secret").unwrap(),
            hash_password("same-secret").unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("plaintext-left-in-column")]
    fn test_malformed_stored_value(#[case] stored: &str) {
        assert!(matches!(
            verify_password("anything", stored),
            Err(PasswordError::InvalidHash)
        ));
    }
}
