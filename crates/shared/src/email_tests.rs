use super::*;
use crate::config::EmailConfig;

#[tokio::test]
async fn test_new_with_defaults() {
    let service = EmailService::new(EmailConfig::default()).unwrap();
    assert_eq!(service.app_url(), "http://localhost:3000");
    assert!(format!("{service:?}").contains("localhost:1025"));
}

#[tokio::test]
async fn test_new_with_credentials() {
    let config = EmailConfig {
        smtp_username: "mailer".to_string(),
        smtp_password: "secret".to_string(),
        ..EmailConfig::default()
    };
    assert!(EmailService::new(config).is_ok());
}

#[tokio::test]
async fn test_new_rejects_bad_sender() {
    let config = EmailConfig {
        from_email: "no-at-sign".to_string(),
        ..EmailConfig::default()
    };
    assert!(matches!(
        EmailService::new(config),
        Err(EmailError::InvalidAddress(_))
    ));
}

#[tokio::test]
async fn test_build_message_rejects_invalid_recipient() {
    let service = EmailService::new(EmailConfig::default()).unwrap();
    let result = service.build_message("not-an-address", "Hi", "<p>Hi</p>");
    assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
}

#[tokio::test]
async fn test_build_message_uses_configured_sender() {
    let service = EmailService::new(EmailConfig::default()).unwrap();
    let message = service
        .build_message("jane@example.com", "Welcome to Cashora", "<h1>Welcome</h1>")
        .unwrap();

    let raw = String::from_utf8(message.formatted()).unwrap();
    assert!(raw.contains("From: Cashora <noreply@cashora.com>"));
    assert!(raw.contains("To: jane@example.com"));
    assert!(raw.contains("Subject: Welcome to Cashora"));
    assert!(raw.contains("text/html"));
}
