//! Admin bulk email.

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use cashora_shared::types::AccountId;
use cashora_shared::{AppError, AppResult};

use crate::access::AccessGate;
use crate::audit::{self, AuditAction, AuditEntry};
use crate::notify::{Delivery, EmailTemplate, deliver};
use crate::ports::Ports;

/// Delivery result for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientDelivery {
    /// Target account.
    pub account_id: AccountId,
    /// Address used, if the account was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Outcome.
    pub delivery: Delivery,
}

/// Sends one custom message to many accounts.
#[derive(Clone)]
pub struct BroadcastService {
    ports: Ports,
    gate: AccessGate,
}

impl BroadcastService {
    /// Creates the service.
    #[must_use]
    pub fn new(ports: Ports, gate: AccessGate) -> Self {
        Self { ports, gate }
    }

    /// Sends `subject`/`html` to every account in `recipients`, concurrently.
    ///
    /// Repeated ids are sent to once, keeping the first position. Unknown
    /// ids are reported as failed deliveries.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `actor` is not an admin, `Validation` for an empty
    /// recipient list or subject.
    pub async fn send(
        &self,
        actor: AccountId,
        recipients: &[AccountId],
        subject: &str,
        html: &str,
    ) -> AppResult<Vec<RecipientDelivery>> {
        self.gate.require_admin(actor).await?;
        if recipients.is_empty() {
            return Err(AppError::Validation("at least one recipient is required".to_string()));
        }
        if subject.trim().is_empty() {
            return Err(AppError::Validation("subject is required".to_string()));
        }

        let mut seen = HashSet::with_capacity(recipients.len());
        let recipients: Vec<AccountId> = recipients
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let accounts = self.ports.accounts.find_many(&recipients).await?;
        let template = EmailTemplate::Custom {
            subject: subject.to_string(),
            html: html.to_string(),
        };

        let sends = recipients.iter().map(|id| {
            let account = accounts.iter().find(|a| a.id == *id);
            let template = &template;
            async move {
                match account {
                    Some(account) => RecipientDelivery {
                        account_id: *id,
                        email: Some(account.email.clone()),
                        delivery: deliver(self.ports.notifier.as_ref(), &account.email, template)
                            .await,
                    },
                    None => RecipientDelivery {
                        account_id: *id,
                        email: None,
                        delivery: Delivery::Failed {
                            template: Some(template.key()),
                            error: "account not found".to_string(),
                        },
                    },
                }
            }
        });
        let results = join_all(sends).await;

        let sent = results
            .iter()
            .filter(|r| matches!(r.delivery, Delivery::Sent { .. }))
            .count();
        info!(actor = %actor, recipients = results.len(), sent, "Bulk email sent");

        audit::record(
            self.ports.audit.as_ref(),
            AuditEntry::new(
                actor,
                AuditAction::BulkEmailSent,
                format!("\"{subject}\" to {sent}/{} recipients", results.len()),
            ),
        )
        .await;

        Ok(results)
    }
}

impl std::fmt::Debug for BroadcastService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashora_shared::TerminalPolicy;
    use rust_decimal::Decimal;

    use crate::account::{Account, AccountStatus, NewAccount, Profile, Role};
    use crate::memory::MemoryPorts;
    use crate::ports::AccountStore;
    use crate::services::Services;

    async fn insert(mem: &MemoryPorts, email: &str, role: Role) -> Account {
        mem.accounts
            .insert(NewAccount {
                email: email.to_string(),
                password_hash: String::new(),
                role,
                status: AccountStatus::Approved,
                balance: Decimal::ZERO,
                profile: Profile::default(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_reports_each_recipient() {
        let mem = MemoryPorts::default();
        let services = Services::new(mem.ports(), TerminalPolicy::Overwrite);
        let admin = insert(&mem, "admin@cashora.com", Role::Admin).await;
        let a = insert(&mem, "a@example.com", Role::User).await;
        let b = insert(&mem, "b@example.com", Role::User).await;
        let ghost = AccountId::new();

        let results = services
            .broadcast
            .send(admin.id, &[a.id, b.id, ghost], "Maintenance", "<p>Tonight</p>")
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].email.as_deref(), Some("a@example.com"));
        assert!(matches!(results[1].delivery, Delivery::Sent { .. }));
        assert!(results[2].delivery.is_failed());
        assert_eq!(mem.notifier.sent_with("custom").len(), 2);

        let audit = mem.audit.entries();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::BulkEmailSent);
        assert_eq!(audit[0].account_id, admin.id);
    }

    #[tokio::test]
    async fn test_broadcast_sends_once_per_account() {
        let mem = MemoryPorts::default();
        let services = Services::new(mem.ports(), TerminalPolicy::Overwrite);
        let admin = insert(&mem, "admin@cashora.com", Role::Admin).await;
        let a = insert(&mem, "a@example.com", Role::User).await;
        let b = insert(&mem, "b@example.com", Role::User).await;

        let results = services
            .broadcast
            .send(admin.id, &[a.id, b.id, a.id, a.id], "Maintenance", "<p>Tonight</p>")
            .await
            .unwrap();

        let ids: Vec<AccountId> = results.iter().map(|r| r.account_id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        let sent = mem.notifier.sent_with("custom");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent.iter().filter(|m| m.to == "a@example.com").count(), 1);
        assert!(mem.audit.entries()[0].details.contains("2/2"));
    }

    #[tokio::test]
    async fn test_broadcast_requires_admin() {
        let mem = MemoryPorts::default();
        let services = Services::new(mem.ports(), TerminalPolicy::Overwrite);
        let user = insert(&mem, "a@example.com", Role::User).await;

        let result = services
            .broadcast
            .send(user.id, &[user.id], "Hi", "<p>Hi</p>")
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert!(mem.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_validates_input() {
        let mem = MemoryPorts::default();
        let services = Services::new(mem.ports(), TerminalPolicy::Overwrite);
        let admin = insert(&mem, "admin@cashora.com", Role::Admin).await;

        assert!(matches!(
            services.broadcast.send(admin.id, &[], "Hi", "x").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            services.broadcast.send(admin.id, &[admin.id], "  ", "x").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_failures_do_not_abort() {
        let mem = MemoryPorts::default();
        let services = Services::new(mem.ports(), TerminalPolicy::Overwrite);
        let admin = insert(&mem, "admin@cashora.com", Role::Admin).await;
        let a = insert(&mem, "a@example.com", Role::User).await;
        mem.notifier.set_failing(true);

        let results = services
            .broadcast
            .send(admin.id, &[a.id, admin.id], "Hi", "<p>Hi</p>")
            .await
            .unwrap();
        assert!(results.iter().all(|r| r.delivery.is_failed()));
    }
}
