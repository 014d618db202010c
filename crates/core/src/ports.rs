//! Storage ports the services depend on.
//!
//! The Postgres repositories in `cashora-db` and the in-memory stores in
//! [`crate::memory`] both implement these traits. Services hold them as
//! `Arc<dyn ...>` so there is no process-wide client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

use cashora_shared::AppError;
use cashora_shared::types::{AccountId, TransactionId};

use crate::account::{Account, AccountStatus, NewAccount};
use crate::audit::AuditEntry;
use crate::notify::Notifier;
use crate::transaction::{NewTransaction, Transaction, TransactionStatus};

/// Errors reported by a store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection, query, decoding).
    #[error("store failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Dependency(msg),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Finds an account by id.
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Finds an account by normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Finds every account whose id is in `ids`. Unknown ids are skipped.
    async fn find_many(&self, ids: &[AccountId]) -> StoreResult<Vec<Account>>;

    /// Lists all accounts, newest first.
    async fn list(&self) -> StoreResult<Vec<Account>>;

    /// Inserts an account. Duplicate email is a `Conflict`.
    async fn insert(&self, account: NewAccount) -> StoreResult<Account>;

    /// Overwrites the status. Returns `None` if the account does not exist.
    async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> StoreResult<Option<Account>>;

    /// Overwrites the balance. Returns `None` if the account does not exist.
    async fn update_balance(&self, id: AccountId, balance: Decimal)
    -> StoreResult<Option<Account>>;
}

/// Transaction persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Finds a transaction by id.
    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>>;

    /// Lists all transactions, newest first.
    async fn list(&self) -> StoreResult<Vec<Transaction>>;

    /// Lists one account's transactions, newest first.
    async fn list_by_account(&self, account_id: AccountId) -> StoreResult<Vec<Transaction>>;

    /// Inserts a transaction in `Pending` status.
    async fn insert(&self, transaction: NewTransaction) -> StoreResult<Transaction>;

    /// Overwrites the status. Returns `None` if the transaction does not exist.
    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> StoreResult<Option<Transaction>>;
}

/// Append-only audit trail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends one entry.
    async fn record(&self, entry: AuditEntry) -> StoreResult<()>;
}

/// The set of ports a service graph is built from.
#[derive(Clone)]
pub struct Ports {
    /// Account store.
    pub accounts: Arc<dyn AccountStore>,
    /// Transaction store.
    pub transactions: Arc<dyn TransactionStore>,
    /// Audit log.
    pub audit: Arc<dyn AuditLog>,
    /// Outbound notifications.
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports").finish_non_exhaustive()
    }
}
