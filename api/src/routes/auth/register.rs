use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use gk_core::repositories::AccountRepository;
use gk_core::services::{NewAccount, RegisterOutcome};
use gk_shared::types::ApiResponse;

use crate::dto::{AccountView, RegisterRequest};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an account from a unique username and email. With email
/// verification enabled (the default) the response carries no tokens; the
/// account can only sign in after following the emailed verification link.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "mara",
///     "email": "mara@example.com",
///     "password": "correct-horse-battery",
///     "firstName": "Mara",
///     "lastName": "Holt"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "status": "success",
///     "message": "Account created. Please check your email to verify your address.",
///     "data": { "account": { ... } }
/// }
/// ```
///
/// When verification is disabled the envelope carries `accessToken` and
/// `refreshToken` instead of the message.
///
/// ## Errors
/// - 400 Bad Request: invalid request data or duplicate email/username
/// - 500 Internal Server Error: database failure
pub async fn register<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let request = request.into_inner();
    let new_account = NewAccount {
        username: request.username,
        email: request.email,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
    };

    match state.auth_service.register(new_account).await {
        Ok(RegisterOutcome::VerificationPending { account }) => HttpResponse::Created().json(
            ApiResponse::success_with_data(json!({ "account": AccountView::from(&account) }))
                .with_message("Account created. Please check your email to verify your address."),
        ),
        Ok(RegisterOutcome::SessionIssued { account, tokens }) => HttpResponse::Created().json(
            ApiResponse::success_with_data(json!({ "account": AccountView::from(&account) }))
                .with_tokens(tokens.access_token, tokens.refresh_token),
        ),
        Err(error) => domain_error_response(&error, state.environment),
    }
}
