use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use gk_core::repositories::AccountRepository;
use gk_shared::types::ApiResponse;

use crate::dto::{AccountView, ResetPasswordRequest};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for PATCH /api/v1/auth/reset-password/{token}
///
/// Sets a new password using the token from the reset email, then revokes
/// every outstanding refresh token and signs the account in with a fresh
/// session pair. Sessions on other devices die with the old password.
///
/// # Errors
/// - 400 Bad Request: password too short, or token unknown/used/expired
/// - 500 Internal Server Error: database or token generation failure
pub async fn reset_password<R>(
    state: web::Data<AppState<R>>,
    token: web::Path<String>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .reset_password(&token, &request.password)
        .await
    {
        Ok((account, tokens)) => HttpResponse::Ok().json(
            ApiResponse::success_with_data(json!({ "account": AccountView::from(&account) }))
                .with_tokens(tokens.access_token, tokens.refresh_token)
                .with_message("Password reset successfully."),
        ),
        Err(error) => domain_error_response(&error, state.environment),
    }
}
