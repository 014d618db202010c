//! Outbound SMTP.
//!
//! One transport and one sender mailbox are built from [`EmailConfig`] at
//! startup and reused for every message.

use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// SMTP failures.
#[derive(Debug, Error)]
pub enum EmailError {
    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// The relay could not be reached or refused the message.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Sender or recipient address does not parse.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// SMTP client for transactional email.
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    relay: String,
    app_url: String,
}

impl EmailService {
    /// Builds the transport and sender from `config`.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for a bad `from_email`, `SendError` if the TLS relay
    /// cannot be configured.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let sender: Address = config
            .from_email
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{}: {e}", config.from_email)))?;
        let from = Mailbox::new(Some(config.from_name.clone()), sender);

        let builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        let mut builder = builder.port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            relay: format!("{}:{}", config.smtp_host, config.smtp_port),
            app_url: config.app_url,
        })
    }

    /// Public URL of the web app, for links inside templates.
    #[must_use]
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    fn build_message(&self, to: &str, subject: &str, html: &str) -> Result<Message, EmailError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{to}: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends one HTML message.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for a bad recipient, `SendError` when the relay
    /// fails.
    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let message = self.build_message(to, subject, html)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("relay", &self.relay)
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
