//! Authentication route handlers
//!
//! This module contains the endpoints for the account credential lifecycle:
//! - Registration and email verification
//! - Login, token refresh, and logout
//! - Password reset over emailed tokens

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod verify_email;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use register::register;
pub use resend_verification::resend_verification;
pub use reset_password::reset_password;
pub use verify_email::verify_email;
