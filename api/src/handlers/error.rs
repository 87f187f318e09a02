//! Domain error to HTTP response mapping
//!
//! Operational errors carry client-safe messages and map to 4xx; delivery
//! failures surface as 500 with their own message. `Database` and
//! `Internal` details only leave the server in development.

use actix_web::HttpResponse;
use tracing::error;
use validator::ValidationErrors;

use gk_core::errors::{AuthError, DomainError, TokenError};
use gk_shared::config::Environment;
use gk_shared::types::MessageResponse;

/// Message returned for unexpected server errors outside of development
const MASKED_SERVER_ERROR: &str = "Something went very wrong!";

/// Convert a DTO validation failure into the 400 fail envelope
///
/// The per-field errors ride along in `data` so clients can highlight the
/// offending inputs.
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = MessageResponse::fail("Invalid request data");
    if let Ok(details) = serde_json::to_value(errors) {
        response.data = Some(details);
    }
    HttpResponse::BadRequest().json(response)
}

/// Convert a domain error into its HTTP response
pub fn domain_error_response(error: &DomainError, environment: Environment) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => {
            let response = MessageResponse::fail(auth_error.to_string());
            match auth_error {
                AuthError::InvalidCredentials | AuthError::EmailNotVerified => {
                    HttpResponse::Unauthorized().json(response)
                }
                AuthError::AccountNotFound => HttpResponse::NotFound().json(response),
                AuthError::DuplicateEmail
                | AuthError::AlreadyVerified
                | AuthError::TokenInvalidOrExpired => HttpResponse::BadRequest().json(response),
            }
        }
        DomainError::Token(TokenError::TokenGenerationFailed) => {
            error!("Token generation failed");
            HttpResponse::InternalServerError()
                .json(MessageResponse::error("Token generation failed"))
        }
        DomainError::Token(token_error) => {
            HttpResponse::Unauthorized().json(MessageResponse::fail(token_error.to_string()))
        }
        DomainError::Validation(validation_error) => {
            HttpResponse::BadRequest().json(MessageResponse::fail(validation_error.to_string()))
        }
        DomainError::Delivery(delivery_error) => HttpResponse::InternalServerError()
            .json(MessageResponse::error(delivery_error.to_string())),
        DomainError::NotFound { resource } => HttpResponse::NotFound()
            .json(MessageResponse::fail(format!("{} not found", resource))),
        DomainError::Database { message } | DomainError::Internal { message } => {
            error!("Unhandled server error: {}", message);
            let message = if environment.is_development() {
                message.clone()
            } else {
                MASKED_SERVER_ERROR.to_string()
            };
            HttpResponse::InternalServerError().json(MessageResponse::error(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use gk_core::errors::ValidationError;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_credentials_maps_to_401_fail() {
        let response = domain_error_response(
            &DomainError::Auth(AuthError::InvalidCredentials),
            Environment::Development,
        );

        assert_eq!(response.status(), 401);
        let body = body_json(response).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_400() {
        let response = domain_error_response(
            &DomainError::Auth(AuthError::DuplicateEmail),
            Environment::Development,
        );
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_account_not_found_maps_to_404() {
        let response = domain_error_response(
            &DomainError::Auth(AuthError::AccountNotFound),
            Environment::Development,
        );
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_maps_to_401() {
        let response = domain_error_response(
            &DomainError::Token(TokenError::MissingRefreshToken),
            Environment::Development,
        );

        assert_eq!(response.status(), 401);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Refresh token is required");
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let response = domain_error_response(
            &DomainError::Validation(ValidationError::InvalidEmail),
            Environment::Development,
        );
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_internal_error_is_masked_in_production() {
        let error = DomainError::Internal {
            message: "connection pool exhausted".to_string(),
        };

        let masked = domain_error_response(&error, Environment::Production);
        assert_eq!(masked.status(), 500);
        let body = body_json(masked).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], MASKED_SERVER_ERROR);

        let open = domain_error_response(&error, Environment::Development);
        let body = body_json(open).await;
        assert_eq!(body["message"], "connection pool exhausted");
    }
}
