//! Core business logic for Cashora.
//!
//! Domain types, the admin access gate, the status lifecycle shared by
//! accounts and transactions, and the services built on them. Persistence
//! and delivery are reached only through the traits in [`ports`] and
//! [`notify`].
//!
//! # Modules
//!
//! - `access` - Admin gate
//! - `account` - Accounts, signup, login, review
//! - `transaction` - Deposits, withdrawals, sends
//! - `lifecycle` - Gated status transition with notification
//! - `notify` - Email templates and the notifier port
//! - `broadcast` - Admin bulk email
//! - `memory` - In-memory ports (feature `memory`)

pub mod access;
pub mod account;
pub mod audit;
pub mod auth;
pub mod broadcast;
pub mod lifecycle;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod notify;
pub mod ports;
pub mod services;
pub mod transaction;

pub use access::AccessGate;
pub use ports::{AccountStore, AuditLog, Ports, StoreError, StoreResult, TransactionStore};
pub use services::Services;
