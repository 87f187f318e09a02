//! Business services containing domain logic and use cases.

pub mod auth;
pub mod mailer;
pub mod secret_token;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, CacheInvalidator, NewAccount, RegisterOutcome};
pub use mailer::{EmailDeliveryHandler, EmailJob, MailSender, Mailer, MailerError, EMAIL_QUEUE};
pub use secret_token::{SecretToken, SecretTokenCodec};
pub use token::TokenService;
