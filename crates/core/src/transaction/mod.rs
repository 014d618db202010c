//! Deposits, withdrawals and sends.

pub mod rules;
pub mod service;
pub mod types;

pub use rules::{FEE_RATE, MAX_AMOUNT, TransactionRequest, check_money};
pub use service::TransactionService;
pub use types::{Counterparty, NewTransaction, Transaction, TransactionKind, TransactionStatus};
