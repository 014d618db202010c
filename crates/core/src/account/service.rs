//! Account operations: signup, login, admin review and balance override.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use validator::ValidateEmail;

use cashora_shared::types::AccountId;
use cashora_shared::{AppError, AppResult};

use crate::access::AccessGate;
use crate::account::types::{Account, AccountStatus, NewAccount, Profile, normalize_email};
use crate::audit::{self, AuditAction, AuditEntry};
use crate::auth::{PasswordError, check_strength, hash_password, verify_password};
use crate::lifecycle::{AccountBinding, LifecycleManager, TransitionOutcome};
use crate::notify::{Dispatched, EmailTemplate, deliver};
use crate::ports::{AccountStore, Ports};
use crate::transaction::check_money;

/// Signup form.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Profile data.
    pub profile: Profile,
}

impl Registration {
    fn validate(&self) -> AppResult<()> {
        if !self.email.trim().validate_email() {
            return Err(AppError::Validation("invalid email address".to_string()));
        }
        check_strength(&self.password).map_err(|e| AppError::Validation(e.to_string()))?;
        if self.profile.first_name.trim().is_empty() || self.profile.last_name.trim().is_empty() {
            return Err(AppError::Validation(
                "first and last name are required".to_string(),
            ));
        }
        Ok(())
    }
}

fn password_error(err: PasswordError) -> AppError {
    AppError::Internal(err.to_string())
}

/// Account use cases.
#[derive(Clone)]
pub struct AccountService {
    ports: Ports,
    gate: AccessGate,
    lifecycle: LifecycleManager,
}

impl AccountService {
    /// Creates the service.
    #[must_use]
    pub fn new(ports: Ports, gate: AccessGate, lifecycle: LifecycleManager) -> Self {
        Self {
            ports,
            gate,
            lifecycle,
        }
    }

    fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.ports.accounts
    }

    async fn create(&self, registration: Registration) -> AppResult<Account> {
        registration.validate()?;
        let email = normalize_email(&registration.email);
        if self.accounts().find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!("email {email} already registered")));
        }

        let password_hash = hash_password(&registration.password).map_err(password_error)?;
        let account = self
            .accounts()
            .insert(NewAccount::signup(&email, password_hash, registration.profile))
            .await?;
        Ok(account)
    }

    /// Self-service signup. The account starts pending and a welcome email
    /// is sent.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed form, `Conflict` for a taken email.
    pub async fn register(&self, registration: Registration) -> AppResult<Dispatched<Account>> {
        let account = self.create(registration).await?;
        info!(account_id = %account.id, "Account registered");

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(account.id, AuditAction::AccountCreated, "signup"),
        )
        .await;

        let template = EmailTemplate::Welcome {
            name: account.profile.display_name(),
        };
        let delivery = deliver(self.ports.notifier.as_ref(), &account.email, &template).await;

        Ok(Dispatched {
            record: account,
            delivery,
        })
    }

    /// Admin-initiated signup on someone's behalf.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin, otherwise as [`register`](Self::register).
    pub async fn admin_create(
        &self,
        actor: AccountId,
        registration: Registration,
    ) -> AppResult<Dispatched<Account>> {
        self.gate.require_admin(actor).await?;
        let account = self.create(registration).await?;
        info!(account_id = %account.id, actor = %actor, "Account created by admin");

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                account.id,
                AuditAction::AccountCreated,
                format!("created by admin {actor}"),
            ),
        )
        .await;

        let template = EmailTemplate::AdminCreatedAccount {
            name: account.profile.display_name(),
        };
        let delivery = deliver(self.ports.notifier.as_ref(), &account.email, &template).await;

        Ok(Dispatched {
            record: account,
            delivery,
        })
    }

    /// Checks credentials. Only approved accounts may sign in.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for unknown email or wrong password, `Forbidden` when
    /// the account is not approved.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Account> {
        let invalid = || AppError::Unauthorized("invalid email or password".to_string());

        let account = self
            .accounts()
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        let matches = match verify_password(password, &account.password_hash) {
            Ok(matches) => matches,
            Err(PasswordError::InvalidHash) => {
                warn!(account_id = %account.id, "Stored password hash is malformed");
                false
            }
            Err(e) => return Err(password_error(e)),
        };
        if !matches {
            return Err(invalid());
        }

        if account.status != AccountStatus::Approved {
            return Err(AppError::Forbidden(format!(
                "account is {}, not approved",
                account.status
            )));
        }

        info!(account_id = %account.id, "Login succeeded");
        Ok(account)
    }

    /// Loads an account by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if there is no such account.
    pub async fn get(&self, id: AccountId) -> AppResult<Account> {
        self.accounts()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {id}")))
    }

    /// Lists every account. Admin only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin.
    pub async fn list(&self, actor: AccountId) -> AppResult<Vec<Account>> {
        self.gate.require_admin(actor).await?;
        Ok(self.accounts().list().await?)
    }

    /// Approves or rejects an account and notifies its owner.
    ///
    /// # Errors
    ///
    /// `Validation` when `status` is `pending`, plus every lifecycle error.
    pub async fn set_status(
        &self,
        actor: AccountId,
        id: AccountId,
        status: AccountStatus,
        reason: Option<&str>,
    ) -> AppResult<TransitionOutcome<Account, AccountStatus>> {
        if !status.is_terminal() {
            return Err(AppError::Validation(
                "status must be approved or rejected".to_string(),
            ));
        }

        let binding = AccountBinding::new(self.accounts().clone());
        let outcome = self
            .lifecycle
            .transition(&binding, id, status, actor, reason)
            .await?;

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                id,
                AuditAction::AccountUpdated,
                format!("status {} -> {status} by {actor}", outcome.previous),
            ),
        )
        .await;

        Ok(outcome)
    }

    /// Sets a balance directly. Admin only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin, `Validation` for a
    /// negative balance or one the money column cannot hold, `NotFound`
    /// for an unknown account.
    pub async fn override_balance(
        &self,
        actor: AccountId,
        id: AccountId,
        balance: Decimal,
    ) -> AppResult<Account> {
        self.gate.require_admin(actor).await?;
        if balance < Decimal::ZERO {
            return Err(AppError::Validation("balance must not be negative".to_string()));
        }
        check_money(balance, "balance")?;

        let account = self
            .accounts()
            .update_balance(id, balance)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {id}")))?;
        info!(account_id = %id, actor = %actor, %balance, "Balance overridden");

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                id,
                AuditAction::BalanceUpdated,
                format!("balance set to {balance} by {actor}"),
            ),
        )
        .await;

        Ok(account)
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
