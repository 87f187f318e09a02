use actix_web::{web, HttpResponse};

use gk_core::errors::{DomainError, TokenError};
use gk_core::repositories::AccountRepository;
use gk_shared::types::MessageResponse;

use crate::dto::RefreshTokenRequest;
use crate::handlers::domain_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token so it can no longer mint access
/// tokens. Logout is idempotent: a token that was already revoked still
/// gets a 200, just with a different message.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": "success",
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or malformed refresh token
pub async fn logout<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    let refresh_token = match request.refresh_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => {
            return domain_error_response(
                &DomainError::Token(TokenError::MissingRefreshToken),
                state.environment,
            )
        }
    };

    match state.auth_service.logout(refresh_token).await {
        Ok(true) => {
            HttpResponse::Ok().json(MessageResponse::success_with_message("Logged out successfully"))
        }
        Ok(false) => HttpResponse::Ok().json(MessageResponse::success_with_message("Logged out")),
        Err(error) => domain_error_response(&error, state.environment),
    }
}
