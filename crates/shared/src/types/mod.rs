//! Identifier types shared by every layer.

pub mod id;

pub use id::{AccountId, TransactionId};
