//! Consumer side of outbound email

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use gk_shared::validation::mask_email;

use crate::queue::{DeliveryJob, JobHandler};

use super::service::EmailJob;

/// Transport seam for delivering a rendered email
///
/// The production implementation speaks SMTP; tests substitute a recorder.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// [`JobHandler`] for the email queue
///
/// Any error returned here counts one failed delivery attempt and goes
/// through the regular retry schedule.
pub struct EmailDeliveryHandler {
    sender: Arc<dyn MailSender>,
}

impl EmailDeliveryHandler {
    pub fn new(sender: Arc<dyn MailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl JobHandler for EmailDeliveryHandler {
    async fn handle(&self, job: &DeliveryJob) -> anyhow::Result<()> {
        let email: EmailJob = serde_json::from_value(job.payload.clone())
            .context("email job payload does not deserialize")?;

        self.sender
            .send(&email.to, &email.subject, &email.html)
            .await?;

        tracing::info!(
            job_id = %job.id,
            to = %mask_email(&email.to),
            subject = %email.subject,
            "email delivered"
        );
        Ok(())
    }
}
