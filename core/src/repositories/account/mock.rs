//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{DomainError, ValidationError};

use super::trait_::AccountRepository;

/// Mock account repository for testing
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts, including soft-deleted ones
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no accounts are stored
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(ValidationError::DuplicateValue {
                field: "email".to_string(),
            }
            .into());
        }
        if accounts.values().any(|a| a.username == account.username) {
            return Err(ValidationError::DuplicateValue {
                field: "username".to_string(),
            }
            .into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).filter(|a| !a.deleted).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email == email && !a.deleted)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.username == username && !a.deleted)
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| {
                !a.deleted
                    && a.email_verification_token_hash.as_deref() == Some(token_hash)
                    && a.verification_token_valid(now)
            })
            .cloned())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| {
                !a.deleted
                    && a.password_reset_token_hash.as_deref() == Some(token_hash)
                    && a.reset_token_valid(now)
            })
            .cloned())
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        account.email_verification_token_hash = Some(token_hash.to_string());
        account.email_verification_expires_at = Some(expires_at);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn clear_verification_token(&self, id: Uuid) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.clear_verification_token();
        }
        Ok(())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        account.mark_email_verified();
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        account.password_reset_token_hash = Some(token_hash.to_string());
        account.password_reset_expires_at = Some(expires_at);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.clear_reset_token();
        }
        Ok(())
    }

    async fn reset_credentials(
        &self,
        id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        account.password_hash = new_password_hash.to_string();
        account.clear_reset_token();
        account.active_refresh_tokens.clear();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn push_refresh_token(&self, id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        account.active_refresh_tokens.push(token.to_string());
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn pull_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;
        let before = account.active_refresh_tokens.len();
        account.active_refresh_tokens.retain(|t| t != token);
        Ok(account.active_refresh_tokens.len() < before)
    }

    async fn has_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&id)
            .map(|a| a.active_refresh_tokens.iter().any(|t| t == token))
            .unwrap_or(false))
    }

    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.active_refresh_tokens.clear();
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&id) {
            account.record_login();
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id) {
            Some(account) if !account.deleted => {
                account.soft_delete();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::account::Profile;

    fn sample_account(username: &str, email: &str) -> Account {
        Account::new(
            username,
            email,
            "$2b$10$hash".to_string(),
            Profile::new("Test", "Account"),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MockAccountRepository::new();
        let account = repo
            .create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        let by_id = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "mara@example.com");

        let by_email = repo.find_by_email("mara@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, account.id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = MockAccountRepository::new();
        repo.create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(sample_account("other", "mara@example.com"))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::DuplicateValue { .. }))
        ));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_soft_deleted_accounts_are_hidden() {
        let repo = MockAccountRepository::new();
        let account = repo
            .create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        assert!(repo.soft_delete(account.id).await.unwrap());
        assert!(repo.find_by_id(account.id).await.unwrap().is_none());
        assert!(repo
            .find_by_email("mara@example.com")
            .await
            .unwrap()
            .is_none());
        // Second delete reports not found
        assert!(!repo.soft_delete(account.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_verification_token_lookup_honors_expiry() {
        let repo = MockAccountRepository::new();
        let account = repo
            .create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        let expires = Utc::now() + chrono::Duration::minutes(10);
        repo.set_verification_token(account.id, "digest", expires)
            .await
            .unwrap();

        let now = Utc::now();
        assert!(repo
            .find_by_verification_token("digest", now)
            .await
            .unwrap()
            .is_some());
        // Wrong hash
        assert!(repo
            .find_by_verification_token("other", now)
            .await
            .unwrap()
            .is_none());
        // Past expiry
        let later = expires + chrono::Duration::seconds(1);
        assert!(repo
            .find_by_verification_token("digest", later)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_refresh_token_push_pull() {
        let repo = MockAccountRepository::new();
        let account = repo
            .create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        repo.push_refresh_token(account.id, "token-a").await.unwrap();
        repo.push_refresh_token(account.id, "token-b").await.unwrap();

        assert!(repo.has_refresh_token(account.id, "token-a").await.unwrap());
        assert!(repo.pull_refresh_token(account.id, "token-a").await.unwrap());
        assert!(!repo.has_refresh_token(account.id, "token-a").await.unwrap());
        // Pulling again is a no-op
        assert!(!repo.pull_refresh_token(account.id, "token-a").await.unwrap());
        // The other session is untouched
        assert!(repo.has_refresh_token(account.id, "token-b").await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_credentials_revokes_sessions() {
        let repo = MockAccountRepository::new();
        let account = repo
            .create(sample_account("mara", "mara@example.com"))
            .await
            .unwrap();

        repo.push_refresh_token(account.id, "token-a").await.unwrap();
        repo.set_reset_token(account.id, "digest", Utc::now() + chrono::Duration::minutes(10))
            .await
            .unwrap();

        repo.reset_credentials(account.id, "$2b$10$newhash")
            .await
            .unwrap();

        let stored = repo.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$2b$10$newhash");
        assert!(stored.password_reset_token_hash.is_none());
        assert!(stored.active_refresh_tokens.is_empty());
    }
}
