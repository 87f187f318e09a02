use actix_web::{web, HttpResponse};

use gk_core::errors::{DomainError, TokenError};
use gk_core::repositories::AccountRepository;
use gk_shared::types::MessageResponse;

use crate::dto::RefreshTokenRequest;
use crate::handlers::domain_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a valid refresh token for a new access token. The refresh
/// token itself stays valid until logout or a password reset revokes it.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": "success",
///     "accessToken": "eyJhbGciOiJIUzI1NiIs..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing, invalid, expired, or revoked refresh token
pub async fn refresh<R>(
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

    match state.auth_service.refresh(refresh_token).await {
        Ok(access_token) => {
            HttpResponse::Ok().json(MessageResponse::success().with_access_token(access_token))
        }
        Err(error) => domain_error_response(&error, state.environment),
    }
}
