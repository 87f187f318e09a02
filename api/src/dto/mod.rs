//! Request and response data transfer objects

pub mod auth;

pub use auth::{
    AccountView, EmailRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest,
};
