//! Producer side of outbound email

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gk_shared::validation::mask_email;

use crate::queue::{JobQueue, QueueError};

use super::templates;

/// Name of the queue all outbound email goes through
pub const EMAIL_QUEUE: &str = "email";

/// Subject lines for the emails this service sends
pub mod subjects {
    pub const VERIFICATION: &str = "Verify your email address";
    pub const VERIFICATION_RESEND: &str = "Verify your email address (Resend)";
    pub const PASSWORD_RESET: &str = "Your password reset token (valid for 10 minutes)";
}

/// Payload of one email job on the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Failures on the synchronous path of sending an email
#[derive(Error, Debug)]
pub enum MailerError {
    /// A template placeholder had no value at render time
    #[error("Unfilled template placeholder: {0}")]
    UnfilledPlaceholder(String),

    /// The job payload could not be serialized
    #[error("Failed to serialize email payload: {0}")]
    Payload(String),

    /// The broker refused the job
    #[error(transparent)]
    Enqueue(#[from] QueueError),
}

/// Renders account emails and hands them to the job queue
///
/// Links embed the plain secret token; the address they point at is built
/// from the configured public base URL, not from request headers.
pub struct Mailer {
    queue: Arc<dyn JobQueue>,
    public_base_url: String,
}

impl Mailer {
    pub fn new(queue: Arc<dyn JobQueue>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            queue,
            public_base_url,
        }
    }

    /// Queues the initial verification email for a new account
    pub async fn send_verification_email(
        &self,
        to: &str,
        plain_token: &str,
    ) -> Result<(), MailerError> {
        let link = self.verification_link(plain_token);
        let html = templates::render(templates::VERIFICATION_EMAIL, &[("link", &link)])?;
        self.enqueue(to, subjects::VERIFICATION, html).await
    }

    /// Queues a fresh verification email for an account that asked again
    pub async fn resend_verification_email(
        &self,
        to: &str,
        plain_token: &str,
    ) -> Result<(), MailerError> {
        let link = self.verification_link(plain_token);
        let html = templates::render(templates::VERIFICATION_EMAIL, &[("link", &link)])?;
        self.enqueue(to, subjects::VERIFICATION_RESEND, html).await
    }

    /// Queues the password reset email
    pub async fn send_reset_email(&self, to: &str, plain_token: &str) -> Result<(), MailerError> {
        let link = format!(
            "{}/api/v1/auth/reset-password/{}",
            self.public_base_url, plain_token
        );
        let html = templates::render(templates::PASSWORD_RESET_EMAIL, &[("link", &link)])?;
        self.enqueue(to, subjects::PASSWORD_RESET, html).await
    }

    fn verification_link(&self, plain_token: &str) -> String {
        format!(
            "{}/api/v1/auth/verify-email/{}",
            self.public_base_url, plain_token
        )
    }

    async fn enqueue(&self, to: &str, subject: &str, html: String) -> Result<(), MailerError> {
        let email = EmailJob {
            to: to.to_string(),
            subject: subject.to_string(),
            html,
        };
        let payload =
            serde_json::to_value(&email).map_err(|e| MailerError::Payload(e.to_string()))?;
        let job = self.queue.enqueue(EMAIL_QUEUE, payload).await?;
        tracing::info!(
            job_id = %job.id,
            to = %mask_email(to),
            subject = subject,
            "queued outbound email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MemoryJobQueue;
    use std::time::Duration;

    async fn reserve_email(queue: &MemoryJobQueue) -> EmailJob {
        let job = queue
            .reserve(EMAIL_QUEUE, Duration::from_millis(50))
            .await
            .unwrap()
            .expect("an email job should be queued");
        serde_json::from_value(job.payload).unwrap()
    }

    #[tokio::test]
    async fn test_verification_email_carries_link_and_subject() {
        let queue = Arc::new(MemoryJobQueue::new());
        let mailer = Mailer::new(queue.clone(), "https://app.gatekey.io");

        mailer
            .send_verification_email("new@example.com", "tok123")
            .await
            .unwrap();

        let email = reserve_email(&queue).await;
        assert_eq!(email.to, "new@example.com");
        assert_eq!(email.subject, "Verify your email address");
        assert!(email
            .html
            .contains("https://app.gatekey.io/api/v1/auth/verify-email/tok123"));
    }

    #[tokio::test]
    async fn test_resend_uses_the_resend_subject() {
        let queue = Arc::new(MemoryJobQueue::new());
        let mailer = Mailer::new(queue.clone(), "https://app.gatekey.io");

        mailer
            .resend_verification_email("again@example.com", "tok456")
            .await
            .unwrap();

        let email = reserve_email(&queue).await;
        assert_eq!(email.subject, "Verify your email address (Resend)");
    }

    #[tokio::test]
    async fn test_reset_email_points_at_reset_route() {
        let queue = Arc::new(MemoryJobQueue::new());
        let mailer = Mailer::new(queue.clone(), "https://app.gatekey.io");

        mailer
            .send_reset_email("lost@example.com", "tok789")
            .await
            .unwrap();

        let email = reserve_email(&queue).await;
        assert_eq!(
            email.subject,
            "Your password reset token (valid for 10 minutes)"
        );
        assert!(email
            .html
            .contains("https://app.gatekey.io/api/v1/auth/reset-password/tok789"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_trimmed() {
        let queue = Arc::new(MemoryJobQueue::new());
        let mailer = Mailer::new(queue.clone(), "http://localhost:8080/");

        mailer
            .send_verification_email("a@example.com", "t")
            .await
            .unwrap();

        let email = reserve_email(&queue).await;
        assert!(email
            .html
            .contains("http://localhost:8080/api/v1/auth/verify-email/t"));
        assert!(!email.html.contains("8080//"));
    }
}
