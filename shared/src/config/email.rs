//! Email delivery configuration module

use serde::{Deserialize, Serialize};

/// SMTP delivery configuration
///
/// Credentials are optional so the service can boot in environments without
/// an SMTP account; delivery then fails at send time and the queue retries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Sender display name
    pub from_name: String,

    /// Sender address
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::from("localhost"),
            smtp_port: 1025,
            smtp_username: None,
            smtp_password: None,
            from_name: String::from("Gatekey"),
            from_address: String::from("no-reply@gatekey.local"),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .unwrap_or(1025);
        let smtp_username = std::env::var("SMTP_USERNAME").ok();
        let smtp_password = std::env::var("SMTP_PASSWORD").ok();
        let from_name = std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Gatekey".to_string());
        let from_address = std::env::var("EMAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "no-reply@gatekey.local".to_string());

        Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_address,
        }
    }

    /// Whether SMTP credentials are present
    pub fn has_credentials(&self) -> bool {
        self.smtp_username.is_some() && self.smtp_password.is_some()
    }

    /// RFC 5322 sender mailbox, e.g. `Gatekey <no-reply@gatekey.local>`
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_port, 1025);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_from_mailbox() {
        let config = EmailConfig::default();
        assert_eq!(config.from_mailbox(), "Gatekey <no-reply@gatekey.local>");
    }
}
