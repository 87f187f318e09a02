//! Application factory
//!
//! Builds the Actix application with its middleware stack and routes. The
//! factory is generic over the account repository so integration tests can
//! drive the full HTTP stack against an in-memory implementation.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use gk_core::repositories::AccountRepository;
use gk_shared::config::AppConfig;
use gk_shared::types::MessageResponse;

use crate::middleware::{create_cors, RequestTimeout};
use crate::routes::auth::{
    forgot_password, login, logout, refresh, register, resend_verification, reset_password,
    verify_email,
};
use crate::routes::health::health_check;
use crate::state::AppState;

/// Create and configure the application with all routes and middleware
pub fn create_app<R>(
    state: web::Data<AppState<R>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: AccountRepository + 'static,
{
    let cors = create_cors(&config.cors);
    let timeout = RequestTimeout::from_secs(config.server.request_timeout);

    App::new()
        .app_data(state)
        // Middleware runs in reverse registration order: CORS outermost,
        // then request logging, with the timeout closest to the handlers
        .wrap(timeout)
        .wrap(TracingLogger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::<R>))
                    .route("/login", web::post().to(login::<R>))
                    .route("/refresh", web::post().to(refresh::<R>))
                    .route("/logout", web::post().to(logout::<R>))
                    .route("/verify-email/{token}", web::get().to(verify_email::<R>))
                    .route(
                        "/resend-verification",
                        web::post().to(resend_verification::<R>),
                    )
                    .route("/forgot-password", web::post().to(forgot_password::<R>))
                    .route(
                        "/reset-password/{token}",
                        web::patch().to(reset_password::<R>),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::fail("The requested resource was not found"))
}
