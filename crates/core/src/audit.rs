//! Audit trail entries.

use serde::Serialize;
use std::fmt;
use tracing::warn;

use cashora_shared::types::AccountId;

use crate::ports::AuditLog;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// An account was created by signup or by an admin.
    AccountCreated,
    /// An account status was changed.
    AccountUpdated,
    /// A transaction was requested.
    TransactionCreated,
    /// A transaction status was changed.
    TransactionUpdated,
    /// An admin overrode a balance.
    BalanceUpdated,
    /// An admin sent a bulk email.
    BulkEmailSent,
}

impl AuditAction {
    /// Returns the stored label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountCreated => "account_created",
            Self::AccountUpdated => "account_updated",
            Self::TransactionCreated => "transaction_created",
            Self::TransactionUpdated => "transaction_updated",
            Self::BalanceUpdated => "balance_updated",
            Self::BulkEmailSent => "bulk_email_sent",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record, attributed to the account it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// Account the event concerns.
    pub account_id: AccountId,
    /// Action label.
    pub action: AuditAction,
    /// Free-text details.
    pub details: String,
}

impl AuditEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(account_id: AccountId, action: AuditAction, details: impl Into<String>) -> Self {
        Self {
            account_id,
            action,
            details: details.into(),
        }
    }
}

/// Appends an entry; failures are logged and swallowed.
pub async fn record(log: &dyn AuditLog, entry: AuditEntry) {
    let action = entry.action;
    let account_id = entry.account_id;
    if let Err(e) = log.record(entry).await {
        warn!(error = %e, %action, account_id = %account_id, "Failed to write audit entry");
    }
}
