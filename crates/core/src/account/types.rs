//! Account domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use cashora_shared::types::AccountId;

/// Account role. There are exactly two; only `Admin` passes the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    User,
    /// Back-office operator.
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account review status.
///
/// New accounts start `Pending`; an admin moves them to `Approved` or
/// `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Awaiting admin review.
    Pending,
    /// May sign in and transact.
    Approved,
    /// Refused by an admin.
    Rejected,
}

impl AccountStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true for statuses no further transition is expected from.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional profile data collected at signup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Public handle.
    pub username: Option<String>,
    /// Phone number in international format.
    pub phone_number: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Country or city of residence.
    pub residence: Option<String>,
    /// Nationality.
    pub nationality: Option<String>,
}

impl Profile {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A customer or admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Unique email address.
    pub email: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role.
    pub role: Role,
    /// Review status.
    pub status: AccountStatus,
    /// Balance, never negative.
    pub balance: Decimal,
    /// Profile data.
    #[serde(flatten)]
    pub profile: Profile,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns true if the account holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data needed to insert an account. Stores assign id, timestamps, a zero
/// balance, and the given role/status.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Email address, already normalized to lowercase.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Role.
    pub role: Role,
    /// Initial status.
    pub status: AccountStatus,
    /// Initial balance.
    pub balance: Decimal,
    /// Profile data.
    pub profile: Profile,
}

impl NewAccount {
    /// A pending `user` account with zero balance, as created by signup.
    #[must_use]
    pub fn signup(email: &str, password_hash: String, profile: Profile) -> Self {
        Self {
            email: normalize_email(email),
            password_hash,
            role: Role::User,
            status: AccountStatus::Pending,
            balance: Decimal::ZERO,
            profile,
        }
    }
}

/// Lowercases and trims an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
