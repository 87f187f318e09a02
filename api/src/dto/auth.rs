//! Request and response bodies for the authentication endpoints
//!
//! Wire format is camelCase. Validation here is the first line only; the
//! domain layer re-checks everything it cares about.

use serde::{Deserialize, Serialize};
use validator::Validate;

use gk_core::domain::entities::{Account, Role};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account handle, 3-30 word characters
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    /// Plain password; 72 is the bcrypt input limit
    #[validate(length(min = 8, max = 72))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Body for refresh and logout
///
/// The token is optional at the serde level so a missing field produces the
/// dedicated missing-token error instead of a generic deserialize failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Body for resend-verification and forgot-password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Body for reset-password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

/// Account as it appears in responses
///
/// Credential material (password hash, token hashes) never leaves the
/// server; this view carries only the public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub roles: Vec<Role>,
    pub is_email_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.profile.first_name.clone(),
            last_name: account.profile.last_name.clone(),
            avatar: account.profile.avatar.clone(),
            roles: account.roles.clone(),
            is_email_verified: account.is_email_verified,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gk_core::domain::entities::Profile;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "Password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_register()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request = RegisterRequest {
            password: "short".to_string(),
            ..valid_register()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_deserializes_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{
                "username": "testuser",
                "email": "test@example.com",
                "password": "Password123",
                "firstName": "Test",
                "lastName": "User"
            }"#,
        )
        .unwrap();
        assert_eq!(request.first_name, "Test");
    }

    #[test]
    fn test_refresh_request_tolerates_missing_token() {
        let request: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(request.refresh_token.is_none());
    }

    #[test]
    fn test_account_view_omits_credentials() {
        let account = Account::new(
            "testuser",
            "test@example.com",
            "$2b$10$hash",
            Profile::new("Test", "User"),
        );

        let view = AccountView::from(&account);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["username"], "testuser");
        assert_eq!(value["firstName"], "Test");
        assert_eq!(value["isEmailVerified"], false);
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
