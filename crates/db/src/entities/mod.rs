//! `SeaORM` entity definitions.

pub mod accounts;
pub mod audit_logs;
pub mod sea_orm_active_enums;
pub mod transactions;
