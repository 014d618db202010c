//! Response helpers shared by the route modules.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;
use validator::ValidationErrors;

use cashora_core::notify::Delivery;
use cashora_shared::AppError;

/// Renders an error as `{ "error": CODE, "message": text }`.
///
/// Dependency and internal failures are logged here and reported with a
/// generic message.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.is_server_error() {
        error!(error = %err, "Request failed");
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.public_message(),
        })),
    )
        .into_response()
}

/// Renders `validator` failures as a `VALIDATION_ERROR`.
pub fn validation_response(errors: &ValidationErrors) -> Response {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(ToString::to_string)
        .collect();
    fields.sort();
    error_response(&AppError::Validation(format!(
        "invalid fields: {}",
        fields.join(", ")
    )))
}

/// Status for a mutation that carries a notification: `207 Multi-Status`
/// when the mutation applied but the message failed.
#[must_use]
pub fn mutation_status(delivery: &Delivery, success: StatusCode) -> StatusCode {
    if delivery.is_failed() {
        StatusCode::MULTI_STATUS
    } else {
        success
    }
}

/// Builds a mutation response body with the record under `key` and the
/// notification outcome.
pub fn mutation_body(key: &str, record: Value, delivery: &Delivery) -> Value {
    let mut body = json!({ "notification": delivery });
    body[key] = record;
    body
}
