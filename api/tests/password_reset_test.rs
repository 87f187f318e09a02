//! Integration tests for the password reset endpoints
//!
//! Runs the HTTP stack against the in-memory repository and queue; reset
//! tokens are pulled out of the queued emails the way a mail client would
//! follow them.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web};
use serde_json::json;

use gk_api::app::create_app;
use gk_api::state::AppState;
use gk_core::queue::{JobQueue, MemoryJobQueue};
use gk_core::repositories::MockAccountRepository;
use gk_core::services::{
    AuthService, AuthServiceConfig, EmailJob, Mailer, TokenService, EMAIL_QUEUE,
};
use gk_shared::config::{AppConfig, Environment, JwtConfig};

const BASE_URL: &str = "http://localhost:8080";

fn test_state() -> (
    web::Data<AppState<MockAccountRepository>>,
    Arc<MemoryJobQueue>,
) {
    let queue = Arc::new(MemoryJobQueue::new());
    let job_queue: Arc<dyn JobQueue> = queue.clone();

    let repository = Arc::new(MockAccountRepository::new());
    let token_service = Arc::new(TokenService::new(JwtConfig::new(
        "test-access-secret",
        "test-refresh-secret",
    )));
    let mailer = Arc::new(Mailer::new(job_queue, BASE_URL));
    let config = AuthServiceConfig {
        verification_required: true,
        token_ttl_minutes: 10,
        bcrypt_cost: 4, // keep hashing cheap in tests
    };

    let auth_service = Arc::new(AuthService::new(repository, token_service, mailer, config));
    let state = web::Data::new(AppState::new(auth_service, Environment::Development));
    (state, queue)
}

async fn queued_email(queue: &MemoryJobQueue) -> EmailJob {
    let job = queue
        .reserve(EMAIL_QUEUE, Duration::from_millis(100))
        .await
        .unwrap()
        .expect("an email job should be queued");
    serde_json::from_value(job.payload).unwrap()
}

fn token_from_link(html: &str, route_segment: &str) -> String {
    html.split(route_segment)
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("email should contain the tokenized link")
        .to_string()
}

fn register_body(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "correct-horse-battery",
        "firstName": "Test",
        "lastName": "Account"
    })
}

#[actix_web::test]
async fn test_forgot_password_emails_a_reset_link() {
    let (state, queue) = test_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_body("mara", "mara@example.com"))
        .to_request();
    test::call_service(&app, register).await;
    // Drain the verification email
    queued_email(&queue).await;

    let forgot = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({"email": "mara@example.com"}))
        .to_request();
    let resp = test::call_service(&app, forgot).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token sent to email!");

    let email = queued_email(&queue).await;
    assert_eq!(email.to, "mara@example.com");
    assert_eq!(
        email.subject,
        "Your password reset token (valid for 10 minutes)"
    );
    assert!(email.html.contains("/api/v1/auth/reset-password/"));
}

#[actix_web::test]
async fn test_forgot_password_for_unknown_email_returns_404() {
    let (state, _queue) = test_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let forgot = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({"email": "nobody@example.com"}))
        .to_request();
    let resp = test::call_service(&app, forgot).await;

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No account found with that email address.");
}

#[actix_web::test]
async fn test_reset_password_signs_in_and_revokes_old_sessions() {
    let (state, queue) = test_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    // Register and verify to obtain a live session
    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_body("mara", "mara@example.com"))
        .to_request();
    test::call_service(&app, register).await;
    let email = queued_email(&queue).await;
    let verify_token = token_from_link(&email.html, "/verify-email/");
    let verify = test::TestRequest::get()
        .uri(&format!("/api/v1/auth/verify-email/{}", verify_token))
        .to_request();
    let resp = test::call_service(&app, verify).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let old_refresh = body["refreshToken"].as_str().unwrap().to_string();

    // Request and apply the reset
    let forgot = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({"email": "mara@example.com"}))
        .to_request();
    test::call_service(&app, forgot).await;
    let email = queued_email(&queue).await;
    let reset_token = token_from_link(&email.html, "/reset-password/");

    let reset = test::TestRequest::patch()
        .uri(&format!("/api/v1/auth/reset-password/{}", reset_token))
        .set_json(json!({"password": "a-brand-new-password"}))
        .to_request();
    let resp = test::call_service(&app, reset).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Password reset successfully.");
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());

    // The pre-reset session is gone
    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({"refreshToken": old_refresh}))
        .to_request();
    assert_eq!(test::call_service(&app, refresh).await.status(), 401);

    // Old password dead, new password works
    let old_login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "mara@example.com", "password": "correct-horse-battery"}))
        .to_request();
    assert_eq!(test::call_service(&app, old_login).await.status(), 401);

    let new_login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "mara@example.com", "password": "a-brand-new-password"}))
        .to_request();
    assert_eq!(test::call_service(&app, new_login).await.status(), 200);
}

#[actix_web::test]
async fn test_reset_password_rejects_short_password() {
    let (state, queue) = test_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_body("mara", "mara@example.com"))
        .to_request();
    test::call_service(&app, register).await;
    queued_email(&queue).await;

    let forgot = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({"email": "mara@example.com"}))
        .to_request();
    test::call_service(&app, forgot).await;
    let email = queued_email(&queue).await;
    let reset_token = token_from_link(&email.html, "/reset-password/");

    let reset = test::TestRequest::patch()
        .uri(&format!("/api/v1/auth/reset-password/{}", reset_token))
        .set_json(json!({"password": "short"}))
        .to_request();
    let resp = test::call_service(&app, reset).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request data");
}

#[actix_web::test]
async fn test_reset_token_is_single_use() {
    let (state, queue) = test_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_body("mara", "mara@example.com"))
        .to_request();
    test::call_service(&app, register).await;
    queued_email(&queue).await;

    let forgot = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({"email": "mara@example.com"}))
        .to_request();
    test::call_service(&app, forgot).await;
    let email = queued_email(&queue).await;
    let reset_token = token_from_link(&email.html, "/reset-password/");

    let first = test::TestRequest::patch()
        .uri(&format!("/api/v1/auth/reset-password/{}", reset_token))
        .set_json(json!({"password": "a-brand-new-password"}))
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 200);

    let second = test::TestRequest::patch()
        .uri(&format!("/api/v1/auth/reset-password/{}", reset_token))
        .set_json(json!({"password": "yet-another-password"}))
        .to_request();
    let resp = test::call_service(&app, second).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token is invalid or has expired.");
}
