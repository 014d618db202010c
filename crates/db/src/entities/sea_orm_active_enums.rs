//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_role")]
pub enum AccountRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
pub enum AccountStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdraw")]
    Withdraw,
    #[sea_orm(string_value = "send")]
    Send,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<cashora_core::account::Role> for AccountRole {
    fn from(role: cashora_core::account::Role) -> Self {
        match role {
            cashora_core::account::Role::User => Self::User,
            cashora_core::account::Role::Admin => Self::Admin,
        }
    }
}

impl From<AccountRole> for cashora_core::account::Role {
    fn from(role: AccountRole) -> Self {
        match role {
            AccountRole::User => Self::User,
            AccountRole::Admin => Self::Admin,
        }
    }
}

impl From<cashora_core::account::AccountStatus> for AccountStatus {
    fn from(status: cashora_core::account::AccountStatus) -> Self {
        match status {
            cashora_core::account::AccountStatus::Pending => Self::Pending,
            cashora_core::account::AccountStatus::Approved => Self::Approved,
            cashora_core::account::AccountStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<AccountStatus> for cashora_core::account::AccountStatus {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Pending => Self::Pending,
            AccountStatus::Approved => Self::Approved,
            AccountStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<cashora_core::transaction::TransactionKind> for TransactionType {
    fn from(kind: cashora_core::transaction::TransactionKind) -> Self {
        match kind {
            cashora_core::transaction::TransactionKind::Deposit => Self::Deposit,
            cashora_core::transaction::TransactionKind::Withdraw => Self::Withdraw,
            cashora_core::transaction::TransactionKind::Send => Self::Send,
        }
    }
}

impl From<TransactionType> for cashora_core::transaction::TransactionKind {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdraw => Self::Withdraw,
            TransactionType::Send => Self::Send,
        }
    }
}

impl From<cashora_core::transaction::TransactionStatus> for TransactionStatus {
    fn from(status: cashora_core::transaction::TransactionStatus) -> Self {
        use cashora_core::transaction::TransactionStatus as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Accepted => Self::Accepted,
            S::Completed => Self::Completed,
            S::Rejected => Self::Rejected,
        }
    }
}

impl From<TransactionStatus> for cashora_core::transaction::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Accepted => Self::Accepted,
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Rejected => Self::Rejected,
        }
    }
}
