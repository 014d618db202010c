//! Property tests for the access gate.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use cashora_shared::AppError;
use cashora_shared::types::AccountId;

use super::AccessGate;
use crate::account::{AccountStatus, NewAccount, Profile, Role};
use crate::memory::MemoryAccountStore;
use crate::ports::{AccountStore, MockAccountStore, StoreError};

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Admin)]
}

fn arb_status() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![
        Just(AccountStatus::Pending),
        Just(AccountStatus::Approved),
        Just(AccountStatus::Rejected),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The decision depends on the role alone.
    #[test]
    fn prop_authorize_iff_admin(role in arb_role(), status in arb_status()) {
        let rt = runtime();
        let allowed = rt.block_on(async {
            let store = Arc::new(MemoryAccountStore::default());
            let account = store
                .insert(NewAccount {
                    email: "someone@example.com".to_string(),
                    password_hash: String::new(),
                    role,
                    status,
                    balance: Decimal::ZERO,
                    profile: Profile::default(),
                })
                .await
                .unwrap();
            AccessGate::new(store).authorize(account.id).await
        });
        prop_assert_eq!(allowed, role == Role::Admin);
    }

    /// Unknown callers are never authorized.
    #[test]
    fn prop_unknown_caller_denied(raw in any::<u128>()) {
        let rt = runtime();
        let caller = AccountId::from_uuid(uuid::Uuid::from_u128(raw));
        let allowed = rt.block_on(async {
            AccessGate::new(Arc::new(MemoryAccountStore::default()))
                .authorize(caller)
                .await
        });
        prop_assert!(!allowed);
    }
}

#[tokio::test]
async fn test_lookup_failure_denies() {
    let mut store = MockAccountStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .returning(|_| Err(StoreError::Backend("connection reset".to_string())));

    let gate = AccessGate::new(Arc::new(store));
    assert!(!gate.authorize(AccountId::new()).await);
}

#[tokio::test]
async fn test_require_admin_maps_to_unauthorized() {
    let mut store = MockAccountStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));

    let gate = AccessGate::new(Arc::new(store));
    let result = gate.require_admin(AccountId::new()).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}
