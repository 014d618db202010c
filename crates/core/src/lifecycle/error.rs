//! Lifecycle error types.

use thiserror::Error;

use cashora_shared::AppError;
use cashora_shared::types::AccountId;

use crate::ports::StoreError;

/// Errors a status transition can fail with.
///
/// A notification failure is not an error: the transition has already been
/// applied and the outcome carries the failed delivery instead.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The acting account did not pass the admin gate.
    #[error("Account {actor} is not authorized to change status")]
    Unauthorized {
        /// Acting account.
        actor: AccountId,
    },

    /// The record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Record id.
        id: String,
    },

    /// The record is terminal and the locked policy is active.
    #[error("{entity} {id} is already {status}")]
    Locked {
        /// Entity name.
        entity: &'static str,
        /// Record id.
        id: String,
        /// Current terminal status.
        status: String,
    },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Locked { .. } => 422,
            Self::Store(StoreError::Conflict(_)) => 409,
            Self::Store(StoreError::Backend(_)) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Locked { .. } => "STATUS_LOCKED",
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Backend(_)) => "DEPENDENCY_ERROR",
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Unauthorized { .. } => {
                Self::Unauthorized("admin access required".to_string())
            }
            LifecycleError::NotFound { .. } => Self::NotFound(err.to_string()),
            LifecycleError::Locked { .. } => Self::BusinessRule(err.to_string()),
            LifecycleError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_maps_to_business_rule() {
        let err = LifecycleError::Locked {
            entity: "transaction",
            id: "t1".to_string(),
            status: "approved".to_string(),
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "STATUS_LOCKED");
        let app: AppError = err.into();
        assert_eq!(app.to_string(), "Business rule violation: transaction t1 is already approved");
    }

    #[test]
    fn test_store_backend_is_dependency() {
        let app: AppError = LifecycleError::Store(StoreError::Backend("timeout".to_string())).into();
        assert!(matches!(app, AppError::Dependency(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err = LifecycleError::NotFound {
            entity: "account",
            id: "u1".to_string(),
        };
        assert_eq!(err.to_string(), "account u1 not found");
        assert_eq!(err.status_code(), 404);
    }
}
