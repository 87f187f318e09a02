//! Outbound email composition and delivery
//!
//! The request path renders a template and enqueues an [`EmailJob`]; actual
//! SMTP delivery happens in a background worker through the [`MailSender`]
//! seam. Only the synchronous half (render + enqueue) can fail an API
//! request.

mod handler;
mod service;
mod templates;

pub use handler::{EmailDeliveryHandler, MailSender};
pub use service::{subjects, EmailJob, Mailer, MailerError, EMAIL_QUEUE};
