use actix_web::{web, HttpResponse};
use validator::Validate;

use gk_core::repositories::AccountRepository;
use gk_shared::types::MessageResponse;

use crate::dto::EmailRequest;
use crate::handlers::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/resend-verification
///
/// Rotates the verification token for an unverified account and queues a
/// fresh email. The previously emailed link stops working as soon as this
/// returns.
///
/// # Errors
/// - 400 Bad Request: the email is already verified
/// - 404 Not Found: no account with that email
pub async fn resend_verification<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<EmailRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .resend_verification(&request.email)
        .await
    {
        Ok(()) => {
            HttpResponse::Ok().json(MessageResponse::success_with_message("Verification email sent!"))
        }
        Err(error) => domain_error_response(&error, state.environment),
    }
}
