//! Accounts: signup, sessions, admin review, and balance overrides.

pub mod service;
pub mod types;

pub use service::{AccountService, Registration};
pub use types::{Account, AccountStatus, NewAccount, Profile, Role, normalize_email};
