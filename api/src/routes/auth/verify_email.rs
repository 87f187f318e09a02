use actix_web::{web, HttpResponse};
use serde_json::json;

use gk_core::repositories::AccountRepository;
use gk_shared::types::ApiResponse;

use crate::dto::AccountView;
use crate::handlers::domain_error_response;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/verify-email/{token}
///
/// Consumes the token from the verification email. On the first valid call
/// the account becomes verified and receives its initial session pair, so
/// the emailed link signs the account straight in. The token is single-use
/// and expires after the configured TTL.
///
/// # Errors
/// - 400 Bad Request: token unknown, already used, or expired
/// - 500 Internal Server Error: database or token generation failure
pub async fn verify_email<R>(
    state: web::Data<AppState<R>>,
    token: web::Path<String>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    match state.auth_service.verify_email(&token).await {
        Ok((account, tokens)) => HttpResponse::Ok().json(
            ApiResponse::success_with_data(json!({ "account": AccountView::from(&account) }))
                .with_tokens(tokens.access_token, tokens.refresh_token)
                .with_message("Email verified successfully."),
        ),
        Err(error) => domain_error_response(&error, state.environment),
    }
}
