//! Status lifecycle for accounts and transactions.
//!
//! One primitive covers both: gate the actor, load the record, overwrite
//! the status, and notify the owner when the new status is terminal. The
//! entity-specific parts live behind [`StatusBinding`].

mod binding;
mod error;
mod manager;

pub use binding::{AccountBinding, StatusBinding, TransactionBinding};
pub use error::LifecycleError;
pub use manager::{LifecycleManager, TransitionOutcome};
