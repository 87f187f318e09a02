//! Health check endpoint

use actix_web::HttpResponse;

use gk_shared::types::HealthResponse;

/// Handler for GET /health
///
/// Liveness probe for load balancers and monitoring. Returns 200 as long
/// as the server is accepting connections; dependency health is checked
/// once at startup, not per probe.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy())
}
