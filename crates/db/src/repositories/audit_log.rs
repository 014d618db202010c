//! Audit log repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use cashora_core::audit::AuditEntry;
use cashora_core::ports::{AuditLog, StoreResult};
use cashora_shared::types::AccountId;

use crate::entities::audit_logs;
use crate::repositories::store_error;

/// Postgres-backed [`AuditLog`].
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Entries concerning one account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .filter(audit_logs::Column::AccountId.eq(account_id.into_inner()))
            .order_by_desc(audit_logs::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

#[async_trait]
impl AuditLog for AuditLogRepository {
    async fn record(&self, entry: AuditEntry) -> StoreResult<()> {
        let model = audit_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(entry.account_id.into_inner()),
            action: Set(entry.action.as_str().to_string()),
            details: Set(entry.details),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&self.db).await.map_err(store_error)?;
        Ok(())
    }
}
