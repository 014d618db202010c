//! Access-control gate for privileged mutations.

use std::sync::Arc;
use tracing::{debug, warn};

use cashora_shared::AppError;
use cashora_shared::types::AccountId;

use crate::account::Role;
use crate::ports::AccountStore;

/// Decides whether a caller may perform an admin-only operation.
///
/// The role is read from the account store on every call; it is never taken
/// from the session.
#[derive(Clone)]
pub struct AccessGate {
    accounts: Arc<dyn AccountStore>,
}

impl AccessGate {
    /// Creates a gate over the given account store.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Returns true iff `caller` resolves to an account with the admin role.
    ///
    /// Performs exactly one lookup. A missing account or a failed lookup
    /// yields `false`.
    pub async fn authorize(&self, caller: AccountId) -> bool {
        match self.accounts.find_by_id(caller).await {
            Ok(Some(account)) => account.role == Role::Admin,
            Ok(None) => {
                debug!(caller = %caller, "Gate: caller not found");
                false
            }
            Err(e) => {
                warn!(error = %e, caller = %caller, "Gate: role lookup failed, denying");
                false
            }
        }
    }

    /// Like [`authorize`](Self::authorize), as a `Result`.
    ///
    /// # Errors
    ///
    /// `AppError::Unauthorized` when the caller is not an admin.
    pub async fn require_admin(&self, caller: AccountId) -> Result<(), AppError> {
        if self.authorize(caller).await {
            Ok(())
        } else {
            Err(AppError::Unauthorized("admin access required".to_string()))
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "access_props.rs"]
mod props;
