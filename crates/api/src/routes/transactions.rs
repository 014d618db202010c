//! Customer transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use cashora_core::transaction::{Counterparty, TransactionKind, TransactionRequest};
use cashora_shared::types::TransactionId;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::{error_response, mutation_body, mutation_status, validation_response};

/// Body for deposit, withdraw and send requests. Which optional fields are
/// required depends on the kind.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    /// Unsigned amount.
    pub amount: Decimal,
    /// Send recipient.
    #[validate(length(min = 1, max = 255))]
    pub recipient: Option<String>,
    /// Withdrawal bank.
    #[validate(length(min = 1, max = 255))]
    pub bank_name: Option<String>,
    /// Withdrawal account number.
    #[validate(length(min = 1, max = 100))]
    pub account_number: Option<String>,
    /// Withdrawal account holder.
    #[validate(length(max = 255))]
    pub account_holder_name: Option<String>,
    /// Deposit receipt link.
    #[validate(url)]
    pub receipt_url: Option<String>,
}

impl CreateTransactionRequest {
    fn into_request(self, kind: TransactionKind) -> TransactionRequest {
        TransactionRequest {
            kind,
            amount: self.amount,
            counterparty: Counterparty {
                recipient: self.recipient,
                bank_name: self.bank_name,
                account_number: self.account_number,
                account_holder_name: self.account_holder_name,
                receipt_url: self.receipt_url,
            },
        }
    }
}

/// Creates the transactions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions/deposit", post(deposit))
        .route("/transactions/withdraw", post(withdraw))
        .route("/transactions/send", post(send))
        .route("/transactions/{id}", get(get_transaction))
}

async fn create(
    state: &AppState,
    caller: &AuthUser,
    kind: TransactionKind,
    payload: CreateTransactionRequest,
) -> axum::response::Response {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }

    match state
        .services
        .transactions
        .create(caller.account_id(), payload.into_request(kind))
        .await
    {
        Ok(created) => {
            let status = mutation_status(&created.delivery, StatusCode::CREATED);
            let body = mutation_body("transaction", json!(created.record), &created.delivery);
            (status, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /transactions/deposit
async fn deposit(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    create(&state, &caller, TransactionKind::Deposit, payload).await
}

/// POST /transactions/withdraw
async fn withdraw(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    create(&state, &caller, TransactionKind::Withdraw, payload).await
}

/// POST /transactions/send
async fn send(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    create(&state, &caller, TransactionKind::Send, payload).await
}

/// GET /transactions - The caller's transactions, newest first.
async fn list_transactions(State(state): State<AppState>, caller: AuthUser) -> impl IntoResponse {
    match state.services.transactions.list_own(caller.account_id()).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "transactions": items }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .services
        .transactions
        .get(caller.account_id(), TransactionId::from_uuid(id))
        .await
    {
        Ok(transaction) => {
            (StatusCode::OK, Json(json!({ "transaction": transaction }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}
