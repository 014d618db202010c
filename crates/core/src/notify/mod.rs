//! Outbound notifications.
//!
//! A [`Notifier`] delivers one [`EmailTemplate`] to one address. The SMTP
//! implementation wraps [`EmailService`]; tests use
//! [`crate::memory::RecordingNotifier`].

mod template;

pub use template::{EmailTemplate, Outcome, RenderedEmail};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use cashora_shared::{EmailError, EmailService};

/// Notification failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The message could not be built (bad address, bad header).
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The transport failed to deliver.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A template failed to render.
    #[error("render failure: {0}")]
    Render(String),
}

impl From<askama::Error> for NotifyError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<EmailError> for NotifyError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::SendError(msg) => Self::Transport(msg),
            EmailError::BuildError(msg) | EmailError::InvalidAddress(msg) => Self::Rejected(msg),
        }
    }
}

/// Sends templated messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `template` to `to`.
    async fn send(&self, to: &str, template: &EmailTemplate) -> Result<(), NotifyError>;
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(&self, to: &str, template: &EmailTemplate) -> Result<(), NotifyError> {
        let rendered = template.render(self.app_url())?;
        self.send_html(to, &rendered.subject, &rendered.html).await?;
        Ok(())
    }
}

/// What happened to the notification attached to a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    /// The message was handed to the transport.
    Sent {
        /// Template key.
        template: String,
    },
    /// The mutation succeeded but the message did not go out.
    Failed {
        /// Template key, if one was selected.
        #[serde(skip_serializing_if = "Option::is_none")]
        template: Option<String>,
        /// Failure detail.
        error: String,
    },
    /// No message belongs to this mutation.
    NotRequired,
}

impl Delivery {
    /// Returns true when a message was due but did not go out.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Sends one message and folds the result into a [`Delivery`].
pub async fn deliver(notifier: &dyn Notifier, to: &str, template: &EmailTemplate) -> Delivery {
    let key = template.key();
    match notifier.send(to, template).await {
        Ok(()) => {
            debug!(template = %key, "Notification sent");
            Delivery::Sent { template: key }
        }
        Err(e) => {
            warn!(error = %e, template = %key, "Notification failed");
            Delivery::Failed {
                template: Some(key),
                error: e.to_string(),
            }
        }
    }
}

/// A mutation result with the delivery of its follow-up message.
#[derive(Debug, Clone, Serialize)]
pub struct Dispatched<T> {
    /// The stored record.
    pub record: T,
    /// Notification delivery.
    pub delivery: Delivery,
}

impl<T> Dispatched<T> {
    /// Returns true when the mutation succeeded but the message failed.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.delivery.is_failed()
    }
}
