//! Gated status transition with notification.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use cashora_shared::TerminalPolicy;
use cashora_shared::types::AccountId;

use crate::access::AccessGate;
use crate::lifecycle::binding::StatusBinding;
use crate::lifecycle::error::LifecycleError;
use crate::notify::{Delivery, Notifier, deliver};

/// Result of an applied transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome<R, S> {
    /// The record after the update.
    pub record: R,
    /// Status before the update.
    pub previous: S,
    /// Notification delivery.
    pub delivery: Delivery,
}

impl<R, S> TransitionOutcome<R, S> {
    /// True when the status changed but the message did not go out.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.delivery.is_failed()
    }
}

/// Applies admin-triggered status changes to any bound entity.
#[derive(Clone)]
pub struct LifecycleManager {
    gate: AccessGate,
    notifier: Arc<dyn Notifier>,
    policy: TerminalPolicy,
}

impl LifecycleManager {
    /// Creates a manager.
    #[must_use]
    pub fn new(gate: AccessGate, notifier: Arc<dyn Notifier>, policy: TerminalPolicy) -> Self {
        Self {
            gate,
            notifier,
            policy,
        }
    }

    /// Active re-transition policy.
    #[must_use]
    pub const fn policy(&self) -> TerminalPolicy {
        self.policy
    }

    /// Moves record `id` to `status` on behalf of `actor`.
    ///
    /// The gate check and the record lookup are independent reads and run
    /// concurrently. When `status` is terminal the bound template is sent to
    /// the record's owner; a failed send after the update is reported in the
    /// outcome, not as an error.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin, `NotFound` if the record is
    /// missing, `Locked` under [`TerminalPolicy::Locked`] when the record is
    /// already terminal, `Store` on persistence failure.
    pub async fn transition<B: StatusBinding>(
        &self,
        binding: &B,
        id: B::Id,
        status: B::Status,
        actor: AccountId,
        note: Option<&str>,
    ) -> Result<TransitionOutcome<B::Record, B::Status>, LifecycleError> {
        let (authorized, current) = tokio::join!(self.gate.authorize(actor), binding.load(id));

        if !authorized {
            warn!(actor = %actor, entity = B::ENTITY, id = %id, "Status change refused");
            return Err(LifecycleError::Unauthorized { actor });
        }

        let not_found = || LifecycleError::NotFound {
            entity: B::ENTITY,
            id: id.to_string(),
        };

        let current = current?.ok_or_else(not_found)?;
        let previous = B::status_of(&current);

        if self.policy == TerminalPolicy::Locked && B::is_terminal(previous) {
            return Err(LifecycleError::Locked {
                entity: B::ENTITY,
                id: id.to_string(),
                status: previous.to_string(),
            });
        }

        let record = binding
            .store_status(id, status)
            .await?
            .ok_or_else(not_found)?;

        info!(
            entity = B::ENTITY,
            id = %id,
            from = %previous,
            to = %status,
            actor = %actor,
            "Status changed"
        );

        let delivery = if B::is_terminal(status) {
            self.notify::<B>(binding, &record, status, note).await
        } else {
            Delivery::NotRequired
        };

        Ok(TransitionOutcome {
            record,
            previous,
            delivery,
        })
    }

    async fn notify<B: StatusBinding>(
        &self,
        binding: &B,
        record: &B::Record,
        status: B::Status,
        note: Option<&str>,
    ) -> Delivery {
        let Some(template) = B::template(record, status, note) else {
            return Delivery::NotRequired;
        };

        match binding.recipient(record).await {
            Ok(Some(to)) => deliver(self.notifier.as_ref(), &to, &template).await,
            Ok(None) => Delivery::Failed {
                template: Some(template.key()),
                error: "recipient not found".to_string(),
            },
            Err(e) => {
                warn!(error = %e, entity = B::ENTITY, "Recipient lookup failed");
                Delivery::Failed {
                    template: Some(template.key()),
                    error: e.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
