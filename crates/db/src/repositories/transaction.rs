//! Transaction repository for deposit, withdrawal and send records.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use cashora_core::ports::{StoreResult, TransactionStore};
use cashora_core::transaction::{Counterparty, NewTransaction, Transaction, TransactionStatus};
use cashora_shared::types::{AccountId, TransactionId};

use crate::entities::{sea_orm_active_enums, transactions};
use crate::repositories::store_error;

/// Postgres-backed [`TransactionStore`].
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<transactions::Model> for Transaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            account_id: AccountId::from_uuid(model.account_id),
            kind: model.transaction_type.into(),
            amount: model.amount,
            fee: model.fee,
            status: model.status.into(),
            counterparty: Counterparty {
                recipient: model.recipient,
                bank_name: model.bank_name,
                account_number: model.account_number,
                account_holder_name: model.account_holder_name,
                receipt_url: model.receipt_url,
            },
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn find_by_id(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|model| model.map(Transaction::from))
            .map_err(store_error)
    }

    async fn list(&self) -> StoreResult<Vec<Transaction>> {
        transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(Transaction::from).collect())
            .map_err(store_error)
    }

    async fn list_by_account(&self, account_id: AccountId) -> StoreResult<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.into_inner()))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(Transaction::from).collect())
            .map_err(store_error)
    }

    async fn insert(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        let now = Utc::now().into();
        let counterparty = transaction.counterparty;
        let model = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(transaction.account_id.into_inner()),
            transaction_type: Set(transaction.kind.into()),
            amount: Set(transaction.amount),
            fee: Set(transaction.fee),
            status: Set(sea_orm_active_enums::TransactionStatus::Pending),
            recipient: Set(counterparty.recipient),
            bank_name: Set(counterparty.bank_name),
            account_number: Set(counterparty.account_number),
            account_holder_name: Set(counterparty.account_holder_name),
            receipt_url: Set(counterparty.receipt_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await.map_err(store_error)?;
        debug!(transaction_id = %model.id, "Inserted transaction");
        Ok(model.into())
    }

    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> StoreResult<Option<Transaction>> {
        let Some(model) = transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
        else {
            return Ok(None);
        };

        let mut active: transactions::ActiveModel = model.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await.map_err(store_error)?;
        Ok(Some(model.into()))
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
