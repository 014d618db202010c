//! Email templates.
//!
//! Every template is a pure function of its key and data: rendering never
//! touches a store.

use askama::Template;
use rust_decimal::Decimal;

use cashora_shared::types::TransactionId;

use crate::transaction::{TransactionKind, TransactionStatus};

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Outcome half of a transaction template key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Any success status.
    Approved,
    /// Rejected.
    Rejected,
}

impl Outcome {
    /// Maps a terminal transaction status to its template outcome.
    #[must_use]
    pub const fn of(status: TransactionStatus) -> Option<Self> {
        match status {
            TransactionStatus::Pending => None,
            TransactionStatus::Rejected => Some(Self::Rejected),
            TransactionStatus::Approved
            | TransactionStatus::Accepted
            | TransactionStatus::Completed => Some(Self::Approved),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// All messages the system sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Sent after signup.
    Welcome {
        /// Recipient's display name.
        name: String,
    },
    /// Sent when an admin opens an account on someone's behalf.
    AdminCreatedAccount {
        /// Recipient's display name.
        name: String,
    },
    /// Account moved to approved.
    AccountApproval {
        /// Recipient's display name.
        name: String,
    },
    /// Account moved to rejected.
    AccountRejection {
        /// Recipient's display name.
        name: String,
        /// Optional reason given by the admin.
        reason: Option<String>,
    },
    /// A deposit was submitted for review.
    DepositRequest {
        /// Unsigned amount.
        amount: Decimal,
        /// Transaction id.
        transaction_id: TransactionId,
    },
    /// A withdrawal was submitted for review.
    WithdrawalRequest {
        /// Unsigned amount.
        amount: Decimal,
        /// Fee charged.
        fee: Decimal,
        /// Transaction id.
        transaction_id: TransactionId,
    },
    /// A transaction reached a terminal status.
    TransactionDecision {
        /// Kind of the transaction.
        kind: TransactionKind,
        /// Approved or rejected.
        outcome: Outcome,
        /// Unsigned amount.
        amount: Decimal,
        /// Transaction id.
        transaction_id: TransactionId,
    },
    /// Free-form message from an admin.
    Custom {
        /// Subject line.
        subject: String,
        /// HTML body, sent as given.
        html: String,
    },
}

impl EmailTemplate {
    /// Stable template key, e.g. `account_approval` or `withdrawal_approved`.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Welcome { .. } => "welcome".to_string(),
            Self::AdminCreatedAccount { .. } => "admin_created_account".to_string(),
            Self::AccountApproval { .. } => "account_approval".to_string(),
            Self::AccountRejection { .. } => "account_rejection".to_string(),
            Self::DepositRequest { .. } => "deposit_request".to_string(),
            Self::WithdrawalRequest { .. } => "withdrawal_request".to_string(),
            Self::TransactionDecision { kind, outcome, .. } => {
                format!("{}_{}", kind.noun(), outcome.as_str())
            }
            Self::Custom { .. } => "custom".to_string(),
        }
    }

    /// Renders subject and body. `app_url` is used for sign-in links.
    ///
    /// Interpolated values are HTML-escaped. A custom body is sent as given.
    ///
    /// # Errors
    ///
    /// `askama::Error` if a template fails to render.
    pub fn render(&self, app_url: &str) -> askama::Result<RenderedEmail> {
        let app_url = app_url.trim_end_matches('/');
        let (subject, html) = match self {
            Self::Welcome { name } => (
                "Welcome to Cashora".to_string(),
                WelcomeBody { name }.render()?,
            ),
            Self::AdminCreatedAccount { name } => (
                "Your Cashora account has been created".to_string(),
                AdminCreatedAccountBody { name }.render()?,
            ),
            Self::AccountApproval { name } => (
                "Your Cashora account has been approved".to_string(),
                AccountApprovalBody { name, app_url }.render()?,
            ),
            Self::AccountRejection { name, reason } => (
                "Your Cashora account application".to_string(),
                AccountRejectionBody {
                    name,
                    reason: reason.as_deref().map(str::trim).filter(|r| !r.is_empty()),
                }
                .render()?,
            ),
            Self::DepositRequest {
                amount,
                transaction_id,
            } => (
                "Deposit request received".to_string(),
                DepositRequestBody {
                    amount: *amount,
                    transaction_id: *transaction_id,
                }
                .render()?,
            ),
            Self::WithdrawalRequest {
                amount,
                fee,
                transaction_id,
            } => (
                "Withdrawal request received".to_string(),
                WithdrawalRequestBody {
                    amount: *amount,
                    fee: *fee,
                    transaction_id: *transaction_id,
                }
                .render()?,
            ),
            Self::TransactionDecision {
                kind,
                outcome,
                amount,
                transaction_id,
            } => {
                let noun = kind.noun();
                let (title, verb) = match outcome {
                    Outcome::Approved => ("approved", "has been approved"),
                    Outcome::Rejected => ("rejected", "was rejected"),
                };
                (
                    format!("Your {noun} has been {title}"),
                    TransactionDecisionBody {
                        heading: capitalize(noun),
                        title,
                        noun,
                        verb,
                        amount: *amount,
                        transaction_id: *transaction_id,
                        app_url,
                    }
                    .render()?,
                )
            }
            Self::Custom { subject, html } => (subject.clone(), html.clone()),
        };
        Ok(RenderedEmail { subject, html })
    }
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeBody<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/admin_created_account.html")]
struct AdminCreatedAccountBody<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/account_approval.html")]
struct AccountApprovalBody<'a> {
    name: &'a str,
    app_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/account_rejection.html")]
struct AccountRejectionBody<'a> {
    name: &'a str,
    reason: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/deposit_request.html")]
struct DepositRequestBody {
    amount: Decimal,
    transaction_id: TransactionId,
}

#[derive(Template)]
#[template(path = "email/withdrawal_request.html")]
struct WithdrawalRequestBody {
    amount: Decimal,
    fee: Decimal,
    transaction_id: TransactionId,
}

#[derive(Template)]
#[template(path = "email/transaction_decision.html")]
struct TransactionDecisionBody<'a> {
    heading: String,
    title: &'a str,
    noun: &'a str,
    verb: &'a str,
    amount: Decimal,
    transaction_id: TransactionId,
    app_url: &'a str,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
