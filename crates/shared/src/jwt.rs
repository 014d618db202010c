//! Signed session tokens.
//!
//! Tokens are HS256 JWTs issued by `POST /auth/login` and checked by the API
//! middleware. They identify the caller and nothing else.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::auth::{Claims, SESSION_ISSUER};
use crate::types::AccountId;

/// Session signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret.
    pub secret: String,
    /// Session lifetime in seconds.
    pub expires_in_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expires_in_secs: 3600,
        }
    }
}

/// Session token failures.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Bad signature, wrong issuer, or malformed token.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Past `exp`.
    #[error("token has expired")]
    Expired,
}

/// Issues and checks session tokens.
#[derive(Clone)]
pub struct JwtService {
    expires_in_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Builds the keys from `config.secret`.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            expires_in_secs: config.expires_in_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Signs a session for `account_id`.
    ///
    /// # Errors
    ///
    /// `JwtError::EncodingError` if signing fails.
    pub fn issue(&self, account_id: AccountId) -> Result<String, JwtError> {
        let claims = Claims::new(account_id, Utc::now() + Duration::seconds(self.expires_in_secs));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Verifies signature, issuer and expiry, and returns the claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` past expiry, `JwtError::DecodingError` otherwise.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Session lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.expires_in_secs
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
