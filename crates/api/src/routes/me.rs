//! The caller's own account.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::response::error_response;

/// Creates the me router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /me - The signed-in account.
async fn me(State(state): State<AppState>, caller: AuthUser) -> impl IntoResponse {
    match state.services.accounts.get(caller.account_id()).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(e) => error_response(&e),
    }
}
