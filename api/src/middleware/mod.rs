pub mod cors;
pub mod request_timeout;

pub use cors::create_cors;
pub use request_timeout::RequestTimeout;
