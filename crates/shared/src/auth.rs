//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::AccountId;

/// Issuer written into and required on every session token.
pub const SESSION_ISSUER: &str = "cashora";

/// JWT claims for session tokens.
///
/// Only the account id is carried. The role is never trusted from the
/// token; privileged routes look it up on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: Uuid,
    /// Always [`SESSION_ISSUER`].
    pub iss: String,
    /// Issued at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for `account_id`, issued now and valid until `expires_at`.
    #[must_use]
    pub fn new(account_id: AccountId, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.into_inner(),
            iss: SESSION_ISSUER.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The signed-in account.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.sub)
    }
}
