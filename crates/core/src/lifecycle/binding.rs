//! Entity bindings for the transition primitive.

use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

use cashora_shared::types::{AccountId, TransactionId};

use crate::account::{Account, AccountStatus};
use crate::notify::{EmailTemplate, Outcome};
use crate::ports::{AccountStore, StoreResult, TransactionStore};
use crate::transaction::{Transaction, TransactionStatus};

/// Everything the lifecycle manager needs to know about one kind of record.
#[async_trait]
pub trait StatusBinding: Send + Sync {
    /// Record identifier.
    type Id: Copy + Display + Send + Sync;
    /// Status enum.
    type Status: Copy + Display + PartialEq + Send + Sync;
    /// Stored record.
    type Record: Send + Sync;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Current status of a record.
    fn status_of(record: &Self::Record) -> Self::Status;

    /// True for statuses that end the review.
    fn is_terminal(status: Self::Status) -> bool;

    /// Message for reaching `status`, chosen from the record's kind and the
    /// status only.
    fn template(
        record: &Self::Record,
        status: Self::Status,
        note: Option<&str>,
    ) -> Option<EmailTemplate>;

    /// Loads a record.
    async fn load(&self, id: Self::Id) -> StoreResult<Option<Self::Record>>;

    /// Overwrites the status field.
    async fn store_status(
        &self,
        id: Self::Id,
        status: Self::Status,
    ) -> StoreResult<Option<Self::Record>>;

    /// Address of the account that owns the record.
    async fn recipient(&self, record: &Self::Record) -> StoreResult<Option<String>>;
}

/// Account review status.
#[derive(Clone)]
pub struct AccountBinding {
    accounts: Arc<dyn AccountStore>,
}

impl AccountBinding {
    /// Creates the binding.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl StatusBinding for AccountBinding {
    type Id = AccountId;
    type Status = AccountStatus;
    type Record = Account;

    const ENTITY: &'static str = "account";

    fn status_of(record: &Account) -> AccountStatus {
        record.status
    }

    fn is_terminal(status: AccountStatus) -> bool {
        status.is_terminal()
    }

    fn template(record: &Account, status: AccountStatus, note: Option<&str>) -> Option<EmailTemplate> {
        let name = record.profile.display_name();
        match status {
            AccountStatus::Pending => None,
            AccountStatus::Approved => Some(EmailTemplate::AccountApproval { name }),
            AccountStatus::Rejected => Some(EmailTemplate::AccountRejection {
                name,
                reason: note.map(str::to_string),
            }),
        }
    }

    async fn load(&self, id: AccountId) -> StoreResult<Option<Account>> {
        self.accounts.find_by_id(id).await
    }

    async fn store_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> StoreResult<Option<Account>> {
        self.accounts.update_status(id, status).await
    }

    async fn recipient(&self, record: &Account) -> StoreResult<Option<String>> {
        Ok(Some(record.email.clone()))
    }
}

/// Transaction review status. Messages go to the owning account.
#[derive(Clone)]
pub struct TransactionBinding {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
}

impl TransactionBinding {
    /// Creates the binding.
    #[must_use]
    pub fn new(transactions: Arc<dyn TransactionStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            transactions,
            accounts,
        }
    }
}

#[async_trait]
impl StatusBinding for TransactionBinding {
    type Id = TransactionId;
    type Status = TransactionStatus;
    type Record = Transaction;

    const ENTITY: &'static str = "transaction";

    fn status_of(record: &Transaction) -> TransactionStatus {
        record.status
    }

    fn is_terminal(status: TransactionStatus) -> bool {
        status.is_terminal()
    }

    fn template(
        record: &Transaction,
        status: TransactionStatus,
        _note: Option<&str>,
    ) -> Option<EmailTemplate> {
        Outcome::of(status).map(|outcome| EmailTemplate::TransactionDecision {
            kind: record.kind,
            outcome,
            amount: record.magnitude(),
            transaction_id: record.id,
        })
    }

    async fn load(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        self.transactions.find_by_id(id).await
    }

    async fn store_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> StoreResult<Option<Transaction>> {
        self.transactions.update_status(id, status).await
    }

    async fn recipient(&self, record: &Transaction) -> StoreResult<Option<String>> {
        Ok(self
            .accounts
            .find_by_id(record.account_id)
            .await?
            .map(|owner| owner.email))
    }
}
