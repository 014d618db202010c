//! Admin console routes.
//!
//! Every handler here passes the caller's account id to a service that
//! runs the admin gate; the session itself grants nothing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use cashora_core::account::AccountStatus;
use cashora_core::notify::Delivery;
use cashora_core::transaction::TransactionStatus;
use cashora_shared::AppError;
use cashora_shared::types::{AccountId, TransactionId};

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::{error_response, mutation_body, mutation_status, validation_response};
use crate::routes::auth::RegisterRequest;

/// Body for status changes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    /// Target status.
    #[validate(length(min = 1))]
    pub status: String,
    /// Optional reason, included in account rejection emails.
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Body for balance overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBalanceRequest {
    /// New balance.
    pub balance: Decimal,
}

/// Body for bulk email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkEmailRequest {
    /// Target account ids.
    #[validate(length(min = 1, max = 1000))]
    pub recipients: Vec<Uuid>,
    /// Subject line.
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    /// HTML body.
    #[validate(length(min = 1))]
    pub html: String,
}

/// Creates the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/accounts", get(list_accounts).post(create_account))
        .route("/admin/accounts/{id}/status", put(update_account_status))
        .route("/admin/accounts/{id}/balance", put(update_balance))
        .route("/admin/transactions", get(list_transactions))
        .route("/admin/transactions/{id}/status", put(update_transaction_status))
        .route("/admin/emails", post(send_bulk_email))
}

/// GET /admin/accounts
async fn list_accounts(State(state): State<AppState>, caller: AuthUser) -> impl IntoResponse {
    match state.services.accounts.list(caller.account_id()).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /admin/accounts - Open an account on someone's behalf.
async fn create_account(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }

    match state
        .services
        .accounts
        .admin_create(caller.account_id(), payload.into())
        .await
    {
        Ok(created) => {
            let status = mutation_status(&created.delivery, StatusCode::CREATED);
            let body = mutation_body("account", json!(created.record), &created.delivery);
            (status, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// PUT /admin/accounts/{id}/status - Approve or reject an account.
async fn update_account_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }
    let Some(status) = AccountStatus::parse(&payload.status) else {
        return error_response(&AppError::Validation(format!(
            "unknown account status: {}",
            payload.status
        )));
    };

    match state
        .services
        .accounts
        .set_status(
            caller.account_id(),
            AccountId::from_uuid(id),
            status,
            payload.reason.as_deref(),
        )
        .await
    {
        Ok(outcome) => {
            let status = mutation_status(&outcome.delivery, StatusCode::OK);
            let mut body = mutation_body("account", json!(outcome.record), &outcome.delivery);
            body["previous_status"] = json!(outcome.previous);
            (status, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// PUT /admin/accounts/{id}/balance
async fn update_balance(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBalanceRequest>,
) -> impl IntoResponse {
    match state
        .services
        .accounts
        .override_balance(caller.account_id(), AccountId::from_uuid(id), payload.balance)
        .await
    {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /admin/transactions
async fn list_transactions(State(state): State<AppState>, caller: AuthUser) -> impl IntoResponse {
    match state.services.transactions.list_all(caller.account_id()).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "transactions": items }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT /admin/transactions/{id}/status
async fn update_transaction_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }
    let Some(status) = TransactionStatus::parse(&payload.status) else {
        return error_response(&AppError::Validation(format!(
            "unknown transaction status: {}",
            payload.status
        )));
    };

    match state
        .services
        .transactions
        .set_status(caller.account_id(), TransactionId::from_uuid(id), status)
        .await
    {
        Ok(outcome) => {
            let status = mutation_status(&outcome.delivery, StatusCode::OK);
            let mut body =
                mutation_body("transaction", json!(outcome.record), &outcome.delivery);
            body["previous_status"] = json!(outcome.previous);
            (status, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /admin/emails - Send one message to many accounts.
async fn send_bulk_email(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<BulkEmailRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }
    let recipients: Vec<AccountId> = payload
        .recipients
        .iter()
        .copied()
        .map(AccountId::from_uuid)
        .collect();

    match state
        .services
        .broadcast
        .send(caller.account_id(), &recipients, &payload.subject, &payload.html)
        .await
    {
        Ok(results) => {
            let failed = results.iter().filter(|r| r.delivery.is_failed()).count();
            let sent = results
                .iter()
                .filter(|r| matches!(r.delivery, Delivery::Sent { .. }))
                .count();
            let status = if failed > 0 {
                StatusCode::MULTI_STATUS
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(json!({ "sent": sent, "failed": failed, "results": results })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}
