//! Cashora API Server
//!
//! Main entry point for the Cashora backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashora_api::{AppState, create_router};
use cashora_core::{Ports, Services};
use cashora_db::{AccountRepository, AuditLogRepository, TransactionRepository, connect_with_pool};
use cashora_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashora=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let email_service =
        EmailService::new(config.email.clone()).context("invalid email configuration")?;
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let ports = Ports {
        accounts: Arc::new(AccountRepository::new(db.clone())),
        transactions: Arc::new(TransactionRepository::new(db.clone())),
        audit: Arc::new(AuditLogRepository::new(db)),
        notifier: Arc::new(email_service),
    };
    let terminal_policy = config.workflow.terminal_policy;
    info!(?terminal_policy, "Status workflow configured");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.session.secret.clone(),
        expires_in_secs: i64::try_from(config.session.token_expiry_secs)
            .context("session.token_expiry_secs is out of range")?,
    });

    let state = AppState {
        services: Arc::new(Services::new(ports, terminal_policy)),
        jwt_service: Arc::new(jwt_service),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
