//! Repository tests against the `SeaORM` mock backend.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

use cashora_core::transaction::TransactionKind;

use crate::entities::sea_orm_active_enums::{TransactionStatus as DbStatus, TransactionType};

fn model(status: DbStatus) -> transactions::Model {
    let now = Utc::now().into();
    transactions::Model {
        id: Uuid::now_v7(),
        account_id: Uuid::now_v7(),
        transaction_type: TransactionType::Withdraw,
        amount: dec!(-200.00),
        fee: dec!(4.00),
        status,
        recipient: None,
        bank_name: Some("First Bank".to_string()),
        account_number: Some("0123456789".to_string()),
        account_holder_name: Some("Demo User".to_string()),
        receipt_url: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_insert_returns_pending_record() {
    let row = model(DbStatus::Pending);
    let owner = row.account_id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let inserted = TransactionRepository::new(db)
        .insert(NewTransaction {
            account_id: AccountId::from_uuid(owner),
            kind: TransactionKind::Withdraw,
            amount: dec!(-200),
            fee: dec!(4),
            counterparty: Counterparty {
                bank_name: Some("First Bank".to_string()),
                account_number: Some("0123456789".to_string()),
                ..Counterparty::default()
            },
        })
        .await
        .unwrap();

    assert_eq!(inserted.status, TransactionStatus::Pending);
    assert_eq!(inserted.kind, TransactionKind::Withdraw);
    assert_eq!(inserted.magnitude(), dec!(200));
    assert_eq!(inserted.counterparty.bank_name.as_deref(), Some("First Bank"));
}

#[tokio::test]
async fn test_update_status_overwrites_terminal() {
    let approved = model(DbStatus::Approved);
    let mut rejected = approved.clone();
    rejected.status = DbStatus::Rejected;
    let id = approved.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![approved], vec![rejected]])
        .into_connection();

    let updated = TransactionRepository::new(db)
        .update_status(TransactionId::from_uuid(id), TransactionStatus::Rejected)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, TransactionStatus::Rejected);
}

#[tokio::test]
async fn test_list_by_account_maps_rows() {
    let rows = vec![model(DbStatus::Completed), model(DbStatus::Pending)];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows])
        .into_connection();

    let listed = TransactionRepository::new(db)
        .list_by_account(AccountId::new())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, TransactionStatus::Completed);
}
