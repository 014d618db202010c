//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde_json::json;
use tracing::debug;

use cashora_shared::types::AccountId;
use cashora_shared::{Claims, JwtError};

use crate::AppState;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}

/// Authentication middleware that validates session tokens.
///
/// This middleware:
/// 1. Reads the `Authorization: Bearer` header
/// 2. Verifies the token signature and expiry
/// 3. Stores the claims in request extensions for handlers to access
///
/// The token identifies the caller only. Whether the caller is an admin is
/// decided per request by the access gate.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return unauthorized("Authorization header with Bearer token is required");
    };

    match state.jwt_service.validate_token(bearer.token()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("Session has expired"),
        Err(e) => {
            debug!(error = %e, "Rejected session token");
            unauthorized("Invalid or malformed session token")
        }
    }
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(caller: AuthUser) -> impl IntoResponse {
///     let account_id = caller.account_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the caller's account ID.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.0.account_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}
