//! Transaction operations: customer requests and admin review.

use tracing::info;

use cashora_shared::types::{AccountId, TransactionId};
use cashora_shared::{AppError, AppResult};

use crate::access::AccessGate;
use crate::account::AccountStatus;
use crate::audit::{self, AuditAction, AuditEntry};
use crate::lifecycle::{LifecycleManager, TransactionBinding, TransitionOutcome};
use crate::notify::{Delivery, Dispatched, EmailTemplate, deliver};
use crate::ports::Ports;
use crate::transaction::rules::{self, TransactionRequest};
use crate::transaction::types::{NewTransaction, Transaction, TransactionKind, TransactionStatus};

/// Transaction use cases.
#[derive(Clone)]
pub struct TransactionService {
    ports: Ports,
    gate: AccessGate,
    lifecycle: LifecycleManager,
}

impl TransactionService {
    /// Creates the service.
    #[must_use]
    pub fn new(ports: Ports, gate: AccessGate, lifecycle: LifecycleManager) -> Self {
        Self {
            ports,
            gate,
            lifecycle,
        }
    }

    /// Records a pending transaction for `caller`.
    ///
    /// Deposits and withdrawals send a request acknowledgement; sends do not.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if the caller no longer exists, `Forbidden` if the
    /// caller is not approved, `Validation`/`BusinessRule` from the request
    /// rules.
    pub async fn create(
        &self,
        caller: AccountId,
        request: TransactionRequest,
    ) -> AppResult<Dispatched<Transaction>> {
        let owner = self
            .ports
            .accounts
            .find_by_id(caller)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown account".to_string()))?;
        if owner.status != AccountStatus::Approved {
            return Err(AppError::Forbidden("account is not approved".to_string()));
        }

        rules::validate(&request, owner.balance)?;

        let fee = rules::fee_for(request.kind, request.amount);
        let transaction = self
            .ports
            .transactions
            .insert(NewTransaction {
                account_id: caller,
                kind: request.kind,
                amount: rules::signed_amount(request.kind, request.amount),
                fee,
                counterparty: request.counterparty,
            })
            .await?;

        info!(
            transaction_id = %transaction.id,
            account_id = %caller,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "Transaction requested"
        );

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                caller,
                AuditAction::TransactionCreated,
                format!("{} {} (fee {fee})", transaction.kind, transaction.magnitude()),
            ),
        )
        .await;

        let template = match transaction.kind {
            TransactionKind::Deposit => Some(EmailTemplate::DepositRequest {
                amount: transaction.magnitude(),
                transaction_id: transaction.id,
            }),
            TransactionKind::Withdraw => Some(EmailTemplate::WithdrawalRequest {
                amount: transaction.magnitude(),
                fee,
                transaction_id: transaction.id,
            }),
            TransactionKind::Send => None,
        };
        let delivery = match template {
            Some(template) => deliver(self.ports.notifier.as_ref(), &owner.email, &template).await,
            None => Delivery::NotRequired,
        };

        Ok(Dispatched {
            record: transaction,
            delivery,
        })
    }

    /// The caller's own transactions, newest first.
    ///
    /// # Errors
    ///
    /// `Dependency` if the store fails.
    pub async fn list_own(&self, caller: AccountId) -> AppResult<Vec<Transaction>> {
        Ok(self.ports.transactions.list_by_account(caller).await?)
    }

    /// One transaction, visible to its owner and to admins.
    ///
    /// # Errors
    ///
    /// `NotFound` when missing or owned by someone else and the caller is
    /// not an admin.
    pub async fn get(&self, caller: AccountId, id: TransactionId) -> AppResult<Transaction> {
        let not_found = || AppError::NotFound(format!("transaction {id}"));
        let transaction = self
            .ports
            .transactions
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        if transaction.account_id == caller || self.gate.authorize(caller).await {
            Ok(transaction)
        } else {
            Err(not_found())
        }
    }

    /// Every transaction. Admin only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin.
    pub async fn list_all(&self, actor: AccountId) -> AppResult<Vec<Transaction>> {
        self.gate.require_admin(actor).await?;
        Ok(self.ports.transactions.list().await?)
    }

    /// Moves a transaction to `status` and notifies its owner when terminal.
    ///
    /// # Errors
    ///
    /// Every lifecycle error.
    pub async fn set_status(
        &self,
        actor: AccountId,
        id: TransactionId,
        status: TransactionStatus,
    ) -> AppResult<TransitionOutcome<Transaction, TransactionStatus>> {
        let binding =
            TransactionBinding::new(self.ports.transactions.clone(), self.ports.accounts.clone());
        let outcome = self
            .lifecycle
            .transition(&binding, id, status, actor, None)
            .await?;

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                outcome.record.account_id,
                AuditAction::TransactionUpdated,
                format!("transaction {id} {} -> {status} by {actor}", outcome.previous),
            ),
        )
        .await;

        Ok(outcome)
    }
}

impl std::fmt::Debug for TransactionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
