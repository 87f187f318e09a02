use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use gk_core::repositories::AccountRepository;
use gk_shared::types::ApiResponse;

use crate::dto::{AccountView, LoginRequest};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates an email and password pair and issues a fresh session
/// token pair. Unknown emails and wrong passwords return the same 401 so
/// the response does not reveal which half was wrong.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": "success",
///     "accessToken": "eyJhbGciOiJIUzI1NiIs...",
///     "refreshToken": "eyJhbGciOiJIUzI1NiIs...",
///     "data": { "account": { ... } }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: bad credentials or unverified email
/// - 500 Internal Server Error: database or token generation failure
pub async fn login<R>(
    state: web::Data<AppState<R>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    R: AccountRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok((account, tokens)) => HttpResponse::Ok().json(
            ApiResponse::success_with_data(json!({ "account": AccountView::from(&account) }))
                .with_tokens(tokens.access_token, tokens.refresh_token),
        ),
        Err(error) => domain_error_response(&error, state.environment),
    }
}
