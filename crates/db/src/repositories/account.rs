//! Account repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use cashora_core::account::{Account, AccountStatus, NewAccount, Profile};
use cashora_core::ports::{AccountStore, StoreResult};
use cashora_shared::types::AccountId;

use crate::entities::accounts;
use crate::repositories::store_error;

/// Postgres-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: AccountId) -> StoreResult<Option<accounts::Model>> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            email: model.email,
            password_hash: model.password_hash,
            role: model.role.into(),
            status: model.status.into(),
            balance: model.balance,
            profile: Profile {
                first_name: model.first_name,
                last_name: model.last_name,
                username: model.username,
                phone_number: model.phone_number,
                date_of_birth: model.date_of_birth,
                place_of_birth: model.place_of_birth,
                residence: model.residence,
                nationality: model.nationality,
            },
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.find_model(id).await?.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map(|model| model.map(Account::from))
            .map_err(store_error)
    }

    async fn find_many(&self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(Account::from).collect())
            .map_err(store_error)
    }

    async fn list(&self) -> StoreResult<Vec<Account>> {
        accounts::Entity::find()
            .order_by_desc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(Account::from).collect())
            .map_err(store_error)
    }

    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let now = Utc::now().into();
        let profile = account.profile;
        let model = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            role: Set(account.role.into()),
            status: Set(account.status.into()),
            balance: Set(account.balance),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            username: Set(profile.username),
            phone_number: Set(profile.phone_number),
            date_of_birth: Set(profile.date_of_birth),
            place_of_birth: Set(profile.place_of_birth),
            residence: Set(profile.residence),
            nationality: Set(profile.nationality),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await.map_err(store_error)?;
        debug!(account_id = %model.id, "Inserted account");
        Ok(model.into())
    }

    async fn update_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> StoreResult<Option<Account>> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = model.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await.map_err(store_error)?;
        Ok(Some(model.into()))
    }

    async fn update_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> StoreResult<Option<Account>> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = model.into();
        active.balance = Set(balance);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await.map_err(store_error)?;
        Ok(Some(model.into()))
    }
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
