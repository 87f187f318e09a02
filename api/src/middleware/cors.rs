//! CORS middleware configuration
//!
//! Built from the `CorsConfig` section of the application config. With no
//! configured origins the policy is permissive, which suits development;
//! production deployments list their origins explicitly.

use actix_cors::Cors;
use tracing::info;

use gk_shared::config::CorsConfig;

/// Creates the CORS middleware from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(config.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.allowed_headers.iter().map(String::as_str))
        .max_age(config.max_age as usize);

    if config.allows_any_origin() {
        info!("Configuring CORS to allow any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    // actix-cors rejects credentials combined with a wildcard origin
    if config.allow_credentials && !config.allows_any_origin() {
        cors = cors.supports_credentials();
    }

    cors
}
