//! SMTP transport for outbound email
//!
//! Delivery always runs inside a queue worker, so failures here surface as
//! handler errors and go through the regular retry schedule rather than
//! failing a user request.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use gk_core::services::MailSender;
use gk_shared::config::EmailConfig;

use crate::InfrastructureError;

/// `MailSender` backed by an async SMTP transport
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailSender {
    /// Create a sender from SMTP configuration
    ///
    /// With credentials configured the transport negotiates TLS against the
    /// relay; without them it speaks plain SMTP, which fits local catcher
    /// setups like Mailpit on port 1025.
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_mailbox().parse().map_err(|e| {
            InfrastructureError::Config(format!("Invalid sender mailbox: {}", e))
        })?;

        let builder = if config.has_credentials() {
            let username = config.smtp_username.clone().unwrap_or_default();
            let password = config.smtp_password.clone().unwrap_or_default();
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                .credentials(Credentials::new(username, password))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let transport = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            authenticated = config.has_credentials(),
            "SMTP transport configured"
        );

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().context("recipient address does not parse")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(message)
            .await
            .context("smtp send failed")?;

        debug!(subject = subject, "Email handed to SMTP relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_default_config_builds_lazily() {
        // Building a transport never opens a connection
        let sender = SmtpMailSender::new(&EmailConfig::default());
        assert!(sender.is_ok());
    }

    #[test]
    fn test_new_rejects_malformed_sender_address() {
        let config = EmailConfig {
            from_address: String::from("not an address"),
            ..EmailConfig::default()
        };

        match SmtpMailSender::new(&config) {
            Err(InfrastructureError::Config(message)) => {
                assert!(message.contains("Invalid sender mailbox"));
            }
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }
}
