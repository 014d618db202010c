//! Repository tests against the `SeaORM` mock backend.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

use cashora_core::account::Role;
use cashora_core::ports::StoreError;

use crate::entities::sea_orm_active_enums::{AccountRole, AccountStatus as DbStatus};

fn model(status: DbStatus) -> accounts::Model {
    let now = Utc::now().into();
    accounts::Model {
        id: Uuid::now_v7(),
        email: "demo@cashora.com".to_string(),
        password_hash: "$argon2id$hash".to_string(),
        role: AccountRole::User,
        status,
        balance: dec!(1000.00),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        username: None,
        phone_number: Some("+2348000000000".to_string()),
        date_of_birth: None,
        place_of_birth: None,
        residence: Some("Lagos".to_string()),
        nationality: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_find_by_id_maps_model() {
    let row = model(DbStatus::Approved);
    let id = row.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let account = AccountRepository::new(db)
        .find_by_id(AccountId::from_uuid(id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(account.id.into_inner(), id);
    assert_eq!(account.role, Role::User);
    assert_eq!(account.status, AccountStatus::Approved);
    assert_eq!(account.balance, dec!(1000));
    assert_eq!(account.profile.residence.as_deref(), Some("Lagos"));
}

#[tokio::test]
async fn test_update_status_missing_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection();

    let result = AccountRepository::new(db)
        .update_status(AccountId::new(), AccountStatus::Approved)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_status_overwrites() {
    let pending = model(DbStatus::Pending);
    let mut approved = pending.clone();
    approved.status = DbStatus::Approved;
    let id = pending.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending], vec![approved]])
        .into_connection();

    let updated = AccountRepository::new(db)
        .update_status(AccountId::from_uuid(id), AccountStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, AccountStatus::Approved);
}

#[tokio::test]
async fn test_find_many_empty_skips_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = AccountRepository::new(db.clone());

    assert!(repo.find_many(&[]).await.unwrap().is_empty());
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_find_by_email_issues_one_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model(DbStatus::Pending)]])
        .into_connection();
    let repo = AccountRepository::new(db.clone());

    let found = repo.find_by_email("demo@cashora.com").await.unwrap();
    assert!(found.is_some());

    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_backend_errors_are_mapped() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();

    let err = AccountRepository::new(db).list().await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(msg) if msg.contains("connection reset")));
}
