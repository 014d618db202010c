//! Repository abstractions for data access.
//!
//! Each repository implements one of the storage ports from
//! `cashora_core::ports`, hiding the `SeaORM` implementation details from
//! the services.

pub mod account;
pub mod audit_log;
pub mod transaction;

pub use account::AccountRepository;
pub use audit_log::AuditLogRepository;
pub use transaction::TransactionRepository;

use cashora_core::ports::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error onto the port error. Unique violations become
/// conflicts.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Backend(err.to_string()),
    }
}
