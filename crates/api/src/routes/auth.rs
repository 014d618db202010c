//! Signup and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use cashora_core::account::{Account, Profile, Registration};
use cashora_shared::AppError;

use crate::AppState;
use crate::response::{error_response, mutation_body, mutation_status, validation_response};

/// Signup form, also used by admins creating accounts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// First name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Public handle.
    #[validate(length(max = 100))]
    pub username: Option<String>,
    /// Phone number.
    #[validate(length(max = 50))]
    pub phone_number: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Place of birth.
    #[validate(length(max = 255))]
    pub place_of_birth: Option<String>,
    /// Residence.
    #[validate(length(max = 255))]
    pub residence: Option<String>,
    /// Nationality.
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            profile: Profile {
                first_name: req.first_name,
                last_name: req.last_name,
                username: req.username,
                phone_number: req.phone_number,
                date_of_birth: req.date_of_birth,
                place_of_birth: req.place_of_birth,
                residence: req.residence,
                nationality: req.nationality,
            },
        }
    }
}

/// Login form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed session token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The signed-in account.
    pub account: Account,
}

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Create a pending account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }

    match state.services.accounts.register(payload.into()).await {
        Ok(created) => {
            let status = mutation_status(&created.delivery, StatusCode::CREATED);
            let body = mutation_body("account", json!(created.record), &created.delivery);
            (status, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /auth/login - Exchange credentials for a session token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return validation_response(&e);
    }

    let account = match state
        .services
        .accounts
        .login(&payload.email, &payload.password)
        .await
    {
        Ok(account) => account,
        Err(e) => {
            info!(error = %e, "Login refused");
            return error_response(&e);
        }
    };

    match state.jwt_service.issue(account.id) {
        Ok(access_token) => (
            StatusCode::OK,
            Json(LoginResponse {
                access_token,
                token_type: "Bearer",
                expires_in: state.jwt_service.expires_in(),
                account,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to issue session token");
            error_response(&AppError::Internal(e.to_string()))
        }
    }
}
