//! Transaction domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use cashora_shared::types::{AccountId, TransactionId};

/// Kind of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in, confirmed by an admin against a receipt.
    Deposit,
    /// Money out to a bank account.
    Withdraw,
    /// Money out to another person.
    Send,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Send => "send",
        }
    }

    /// Parses a kind. `withdrawal` is accepted as an alias of `withdraw`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdraw" | "withdrawal" => Some(Self::Withdraw),
            "send" => Some(Self::Send),
            _ => None,
        }
    }

    /// Noun used in email template keys and subjects.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdrawal",
            Self::Send => "send",
        }
    }

    /// Returns true if the amount leaves the account.
    #[must_use]
    pub const fn is_outgoing(&self) -> bool {
        matches!(self, Self::Withdraw | Self::Send)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction status.
///
/// `Pending` is set at creation. `Approved`, `Accepted` and `Completed` are
/// equivalent success outcomes used by different back-office screens;
/// `Rejected` is the failure outcome. All four are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved by an admin.
    Approved,
    /// Accepted by an admin.
    Accepted,
    /// Completed by an admin.
    Completed,
    /// Rejected by an admin.
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "accepted" => Some(Self::Accepted),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true for statuses no further transition is expected from.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true for the success outcomes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Approved | Self::Accepted | Self::Completed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counterparty and bank metadata. Which fields are set depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Recipient of a send (email, phone, or handle).
    pub recipient: Option<String>,
    /// Destination bank for a withdrawal.
    pub bank_name: Option<String>,
    /// Destination account number for a withdrawal.
    pub account_number: Option<String>,
    /// Name on the destination bank account.
    pub account_holder_name: Option<String>,
    /// Link to an uploaded deposit receipt.
    pub receipt_url: Option<String>,
}

/// A deposit, withdrawal, or send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning account.
    pub account_id: AccountId,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed amount: positive for deposits, negative for outgoing kinds.
    pub amount: Decimal,
    /// Fee charged on top of the amount.
    pub fee: Decimal,
    /// Status.
    pub status: TransactionStatus,
    /// Counterparty metadata.
    #[serde(flatten)]
    pub counterparty: Counterparty,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// The unsigned amount the customer asked for.
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Data needed to insert a transaction. Stores assign id, timestamps and
/// the `Pending` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Owning account.
    pub account_id: AccountId,
    /// Kind.
    pub kind: TransactionKind,
    /// Signed amount.
    pub amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Counterparty metadata.
    pub counterparty: Counterparty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_accepts_withdrawal_alias() {
        assert_eq!(TransactionKind::parse("withdrawal"), Some(TransactionKind::Withdraw));
        assert_eq!(TransactionKind::parse("WITHDRAW"), Some(TransactionKind::Withdraw));
        assert_eq!(TransactionKind::parse("refund"), None);
    }

    #[test]
    fn test_status_terminal_and_success() {
        assert!(!TransactionStatus::Pending.is_terminal());
        for status in [
            TransactionStatus::Approved,
            TransactionStatus::Accepted,
            TransactionStatus::Completed,
        ] {
            assert!(status.is_terminal());
            assert!(status.is_success());
        }
        assert!(TransactionStatus::Rejected.is_terminal());
        assert!(!TransactionStatus::Rejected.is_success());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TransactionStatus::Completed.to_string(), "completed");
        assert_eq!(TransactionStatus::parse("Accepted"), Some(TransactionStatus::Accepted));
    }
}
