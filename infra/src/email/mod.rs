//! Email module for SMTP delivery

pub mod smtp;

pub use smtp::SmtpMailSender;
