//! In-memory implementations of the ports, for tests and local runs.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};

use cashora_shared::types::{AccountId, TransactionId};

use crate::account::{Account, AccountStatus, NewAccount};
use crate::audit::AuditEntry;
use crate::notify::{EmailTemplate, Notifier, NotifyError};
use crate::ports::{AccountStore, AuditLog, Ports, StoreError, StoreResult, TransactionStore};
use crate::transaction::{NewTransaction, Transaction, TransactionStatus};

/// Accounts keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore(Arc<RwLock<HashMap<AccountId, Account>>>);

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, uuid::Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.0.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.0.read().values().find(|a| a.email == email).cloned())
    }

    async fn find_many(&self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        let data = self.0.read();
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    async fn list(&self) -> StoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.0.read().values().cloned().collect();
        newest_first(&mut accounts, |a| (a.created_at, a.id.into_inner()));
        Ok(accounts)
    }

    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let mut data = self.0.write();
        if data.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                account.email
            )));
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            status: account.status,
            balance: account.balance,
            profile: account.profile,
            created_at: now,
            updated_at: now,
        };
        data.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> StoreResult<Option<Account>> {
        let mut data = self.0.write();
        Ok(data.get_mut(&id).map(|account| {
            account.status = status;
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn update_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> StoreResult<Option<Account>> {
        let mut data = self.0.write();
        Ok(data.get_mut(&id).map(|account| {
            account.balance = balance;
            account.updated_at = Utc::now();
            account.clone()
        }))
    }
}

/// Transactions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore(Arc<RwLock<HashMap<TransactionId, Transaction>>>);

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        Ok(self.0.read().get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Transaction>> {
        let mut items: Vec<Transaction> = self.0.read().values().cloned().collect();
        newest_first(&mut items, |t| (t.created_at, t.id.into_inner()));
        Ok(items)
    }

    async fn list_by_account(&self, account_id: AccountId) -> StoreResult<Vec<Transaction>> {
        let mut items: Vec<Transaction> = self
            .0
            .read()
            .values()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        newest_first(&mut items, |t| (t.created_at, t.id.into_inner()));
        Ok(items)
    }

    async fn insert(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        let now = Utc::now();
        let transaction = Transaction {
            id: TransactionId::new(),
            account_id: transaction.account_id,
            kind: transaction.kind,
            amount: transaction.amount,
            fee: transaction.fee,
            status: TransactionStatus::Pending,
            counterparty: transaction.counterparty,
            created_at: now,
            updated_at: now,
        };
        self.0.write().insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> StoreResult<Option<Transaction>> {
        let mut data = self.0.write();
        Ok(data.get_mut(&id).map(|transaction| {
            transaction.status = status;
            transaction.updated_at = Utc::now();
            transaction.clone()
        }))
    }
}

/// Audit entries in append order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog(Arc<RwLock<Vec<AuditEntry>>>);

impl MemoryAuditLog {
    /// Snapshot of every entry written so far.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.0.read().clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, entry: AuditEntry) -> StoreResult<()> {
        self.0.write().push(entry);
        Ok(())
    }
}

/// One message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Destination address.
    pub to: String,
    /// Template key.
    pub template: String,
    /// Rendered subject line.
    pub subject: String,
}

#[derive(Debug, Default)]
struct Outbox {
    sent: Vec<SentMessage>,
    failing: bool,
}

/// Notifier that records messages instead of sending them.
///
/// Switch it to failing mode to exercise partial-success paths.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier(Arc<RwLock<Outbox>>);

impl RecordingNotifier {
    /// Every message accepted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.0.read().sent.clone()
    }

    /// Messages accepted with the given template key.
    #[must_use]
    pub fn sent_with(&self, template: &str) -> Vec<SentMessage> {
        self.0
            .read()
            .sent
            .iter()
            .filter(|m| m.template == template)
            .cloned()
            .collect()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.0.write().failing = failing;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, template: &EmailTemplate) -> Result<(), NotifyError> {
        let mut outbox = self.0.write();
        if outbox.failing {
            return Err(NotifyError::Transport("smtp relay unavailable".to_string()));
        }
        let rendered = template.render("http://localhost:3000")?;
        outbox.sent.push(SentMessage {
            to: to.to_string(),
            template: template.key(),
            subject: rendered.subject,
        });
        Ok(())
    }
}

/// Concrete handles to a full in-memory port set.
#[derive(Debug, Clone, Default)]
pub struct MemoryPorts {
    /// Accounts.
    pub accounts: MemoryAccountStore,
    /// Transactions.
    pub transactions: MemoryTransactionStore,
    /// Audit entries.
    pub audit: MemoryAuditLog,
    /// Outbox.
    pub notifier: RecordingNotifier,
}

impl MemoryPorts {
    /// Type-erased ports sharing state with these handles.
    #[must_use]
    pub fn ports(&self) -> Ports {
        Ports {
            accounts: Arc::new(self.accounts.clone()),
            transactions: Arc::new(self.transactions.clone()),
            audit: Arc::new(self.audit.clone()),
            notifier: Arc::new(self.notifier.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Profile, Role};
    use crate::transaction::{Counterparty, TransactionKind};
    use rust_decimal_macros::dec;

    fn new_account(email: &str) -> NewAccount {
        NewAccount::signup(email, "hash".to_string(), Profile::default())
    }

    #[tokio::test]
    async fn test_account_email_unique() {
        let store = MemoryAccountStore::default();
        store.insert(new_account("a@example.com")).await.unwrap();
        let err = store.insert(new_account("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_account_updates() {
        let store = MemoryAccountStore::default();
        let account = store.insert(new_account("a@example.com")).await.unwrap();
        assert_eq!(account.role, Role::User);

        let updated = store
            .update_status(account.id, AccountStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AccountStatus::Approved);

        let updated = store
            .update_balance(account.id, dec!(1000))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.balance, dec!(1000));

        assert!(
            store
                .update_status(AccountId::new(), AccountStatus::Approved)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown() {
        let store = MemoryAccountStore::default();
        let a = store.insert(new_account("a@example.com")).await.unwrap();
        let found = store.find_many(&[a.id, AccountId::new()]).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_transactions_by_account_newest_first() {
        let store = MemoryTransactionStore::default();
        let owner = AccountId::new();
        for amount in [dec!(1), dec!(2), dec!(3)] {
            store
                .insert(NewTransaction {
                    account_id: owner,
                    kind: TransactionKind::Deposit,
                    amount,
                    fee: Decimal::ZERO,
                    counterparty: Counterparty::default(),
                })
                .await
                .unwrap();
        }
        store
            .insert(NewTransaction {
                account_id: AccountId::new(),
                kind: TransactionKind::Deposit,
                amount: dec!(9),
                fee: Decimal::ZERO,
                counterparty: Counterparty::default(),
            })
            .await
            .unwrap();

        let mine = store.list_by_account(owner).await.unwrap();
        let amounts: Vec<Decimal> = mine.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(3), dec!(2), dec!(1)]);
        assert!(mine.iter().all(|t| t.status == TransactionStatus::Pending));
    }

    #[tokio::test]
    async fn test_recording_notifier_failing_mode() {
        let notifier = RecordingNotifier::default();
        let template = EmailTemplate::Welcome {
            name: "Jane".to_string(),
        };
        notifier.send("a@example.com", &template).await.unwrap();
        notifier.set_failing(true);
        assert!(notifier.send("a@example.com", &template).await.is_err());
        assert_eq!(notifier.sent_with("welcome").len(), 1);
    }
}
