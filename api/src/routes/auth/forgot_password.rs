use actix_web::{web, HttpResponse};
use validator::Validate;

use gk_core::repositories::AccountRepository;
use gk_shared::types::MessageResponse;

use crate::dto::EmailRequest;
use crate::handlers::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Issues a short-lived password reset token and queues the email that
/// carries it. Requesting again before the first token expires rotates it;
/// only the latest token works.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": "success",
///     "message": "Token sent to email!"
/// }
/// ```
///
/// ## Errors
/// - 404 Not Found: no account with that email
pub async fn forgot_password<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<EmailRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.forgot_password(&request.email).await {
        Ok(()) => {
            HttpResponse::Ok().json(MessageResponse::success_with_message("Token sent to email!"))
        }
        Err(error) => domain_error_response(&error, state.environment),
    }
}
