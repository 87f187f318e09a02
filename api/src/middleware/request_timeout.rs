//! Request timeout middleware
//!
//! Bounds how long a request may spend in the handler stack. On expiry the
//! client receives a 503 with the standard error envelope instead of a
//! connection that hangs until keep-alive gives up.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpResponse, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    fmt,
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
    time::Duration,
};
use tracing::warn;

use gk_shared::types::MessageResponse;

const TIMEOUT_MESSAGE: &str = "Service timeout. Please try again later.";

/// Request timeout middleware factory
pub struct RequestTimeout {
    timeout: Duration,
}

impl RequestTimeout {
    /// Creates a timeout middleware with the given bound
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Creates a timeout middleware from whole seconds
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutService {
            service: Rc::new(service),
            timeout: self.timeout,
        }))
    }
}

/// Request timeout service implementation
pub struct RequestTimeoutService<S> {
    service: Rc<S>,
    timeout: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let timeout = self.timeout;
        let method = req.method().clone();
        let path = req.path().to_string();

        Box::pin(async move {
            match tokio::time::timeout(timeout, service.call(req)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Request timed out after {:?}: {} {}",
                        timeout, method, path
                    );
                    Err(RequestTimeoutError.into())
                }
            }
        })
    }
}

/// Error returned when the handler stack exceeds the configured timeout
#[derive(Debug)]
struct RequestTimeoutError;

impl fmt::Display for RequestTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TIMEOUT_MESSAGE)
    }
}

impl ResponseError for RequestTimeoutError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::ServiceUnavailable().json(MessageResponse::error(TIMEOUT_MESSAGE))
    }
}
