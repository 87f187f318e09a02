//! Shared application state

use std::sync::Arc;

use gk_core::repositories::AccountRepository;
use gk_core::services::AuthService;
use gk_shared::config::Environment;

/// State shared by every request handler
///
/// Generic over the account repository so integration tests run the full
/// HTTP stack against the in-memory mock.
pub struct AppState<R>
where
    R: AccountRepository,
{
    /// Authentication service
    pub auth_service: Arc<AuthService<R>>,

    /// Runtime environment, used to decide how much error detail leaves
    /// the server
    pub environment: Environment,
}

impl<R> AppState<R>
where
    R: AccountRepository,
{
    pub fn new(auth_service: Arc<AuthService<R>>, environment: Environment) -> Self {
        Self {
            auth_service,
            environment,
        }
    }
}
