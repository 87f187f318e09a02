//! MySQL implementation of the AccountRepository trait.
//!
//! This module provides the concrete implementation of account persistence
//! using MySQL with SQLx. Accounts live in the `accounts` table; the active
//! refresh tokens of an account live in the `account_refresh_tokens` child
//! table so session membership can be changed without rewriting the row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use gk_core::domain::entities::{Account, Profile, Role};
use gk_core::errors::{DomainError, ValidationError};
use gk_core::repositories::AccountRepository;

/// Columns selected for every account lookup
const ACCOUNT_COLUMNS: &str = r#"
    id, username, email, password_hash,
    first_name, last_name, avatar, roles,
    is_email_verified,
    email_verification_token_hash, email_verification_expires_at,
    password_reset_token_hash, password_reset_expires_at,
    last_login_at, deleted, deleted_at, created_at, updated_at
"#;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Serialize the role list into its column form, e.g. `user,admin`
    fn roles_to_column(roles: &[Role]) -> String {
        roles
            .iter()
            .map(|role| match role {
                Role::User => "user",
                Role::Admin => "admin",
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the roles column back into the role list
    ///
    /// Unknown role names fall back to `User` rather than failing the read.
    fn column_to_roles(raw: &str) -> Vec<Role> {
        raw.split(',')
            .filter(|part| !part.is_empty())
            .map(|part| match part.trim() {
                "admin" => Role::Admin,
                _ => Role::User,
            })
            .collect()
    }

    /// Convert a database row to an Account entity
    ///
    /// The refresh token list is loaded separately; callers attach it.
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get id: {}", e),
            })?;
        let roles_raw: String = row
            .try_get("roles")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get roles: {}", e),
            })?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid account UUID: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            profile: Profile {
                first_name: row
                    .try_get("first_name")
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get first_name: {}", e),
                    })?,
                last_name: row
                    .try_get("last_name")
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get last_name: {}", e),
                    })?,
                avatar: row.try_get("avatar").map_err(|e| DomainError::Internal {
                    message: format!("Failed to get avatar: {}", e),
                })?,
            },
            roles: Self::column_to_roles(&roles_raw),
            is_email_verified: row
                .try_get("is_email_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_email_verified: {}", e),
                })?,
            email_verification_token_hash: row
                .try_get("email_verification_token_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get email_verification_token_hash: {}", e),
                })?,
            email_verification_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("email_verification_expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get email_verification_expires_at: {}", e),
                })?,
            password_reset_token_hash: row
                .try_get("password_reset_token_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_reset_token_hash: {}", e),
                })?,
            password_reset_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("password_reset_expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_reset_expires_at: {}", e),
                })?,
            active_refresh_tokens: Vec::new(),
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_login_at: {}", e),
                })?,
            deleted: row.try_get("deleted").map_err(|e| DomainError::Internal {
                message: format!("Failed to get deleted: {}", e),
            })?,
            deleted_at: row
                .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get deleted_at: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }

    /// Load the active refresh tokens of an account, oldest first
    async fn load_refresh_tokens(&self, id: Uuid) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query(
            "SELECT token FROM account_refresh_tokens WHERE account_id = ? ORDER BY id",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to load refresh tokens: {}", e),
        })?;

        rows.iter()
            .map(|row| {
                row.try_get("token").map_err(|e| DomainError::Internal {
                    message: format!("Failed to get token: {}", e),
                })
            })
            .collect()
    }

    /// Fetch one account by an arbitrary WHERE clause and attach its tokens
    async fn fetch_account(
        &self,
        query: &str,
        binds: &[&str],
    ) -> Result<Option<Account>, DomainError> {
        let mut q = sqlx::query(query);
        for bind in binds {
            q = q.bind(*bind);
        }

        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match row {
            Some(row) => {
                let mut account = Self::row_to_account(&row)?;
                account.active_refresh_tokens = self.load_refresh_tokens(account.id).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Map an INSERT failure, turning unique-index violations into
    /// validation errors that name the colliding field
    fn map_insert_error(e: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                let field = if db_err.message().contains("email") {
                    "email"
                } else {
                    "username"
                };
                return ValidationError::DuplicateValue {
                    field: field.to_string(),
                }
                .into();
            }
        }
        DomainError::Database {
            message: format!("Failed to create account: {}", e),
        }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, username, email, password_hash,
                first_name, last_name, avatar, roles,
                is_email_verified,
                email_verification_token_hash, email_verification_expires_at,
                password_reset_token_hash, password_reset_expires_at,
                last_login_at, deleted, deleted_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.profile.first_name)
            .bind(&account.profile.last_name)
            .bind(&account.profile.avatar)
            .bind(Self::roles_to_column(&account.roles))
            .bind(account.is_email_verified)
            .bind(&account.email_verification_token_hash)
            .bind(account.email_verification_expires_at)
            .bind(&account.password_reset_token_hash)
            .bind(account.password_reset_expires_at)
            .bind(account.last_login_at)
            .bind(account.deleted)
            .bind(account.deleted_at)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await
            .map_err(Self::map_insert_error)?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE id = ? AND deleted = FALSE LIMIT 1",
            ACCOUNT_COLUMNS
        );
        self.fetch_account(&query, &[&id.to_string()]).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE email = ? AND deleted = FALSE LIMIT 1",
            ACCOUNT_COLUMNS
        );
        self.fetch_account(&query, &[email]).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE username = ? AND deleted = FALSE LIMIT 1",
            ACCOUNT_COLUMNS
        );
        self.fetch_account(&query, &[username]).await
    }

    async fn find_by_verification_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM accounts
            WHERE email_verification_token_hash = ?
              AND email_verification_expires_at > ?
              AND deleted = FALSE
            LIMIT 1
            "#,
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match row {
            Some(row) => {
                let mut account = Self::row_to_account(&row)?;
                account.active_refresh_tokens = self.load_refresh_tokens(account.id).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM accounts
            WHERE password_reset_token_hash = ?
              AND password_reset_expires_at > ?
              AND deleted = FALSE
            LIMIT 1
            "#,
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match row {
            Some(row) => {
                let mut account = Self::row_to_account(&row)?;
                account.active_refresh_tokens = self.load_refresh_tokens(account.id).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET email_verification_token_hash = ?,
                email_verification_expires_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to set verification token: {}", e),
        })?;

        Ok(())
    }

    async fn clear_verification_token(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET email_verification_token_hash = NULL,
                email_verification_expires_at = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to clear verification token: {}", e),
        })?;

        Ok(())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET is_email_verified = TRUE,
                email_verification_token_hash = NULL,
                email_verification_expires_at = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to mark email verified: {}", e),
        })?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET password_reset_token_hash = ?,
                password_reset_expires_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to set reset token: {}", e),
        })?;

        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET password_reset_token_hash = NULL,
                password_reset_expires_at = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to clear reset token: {}", e),
        })?;

        Ok(())
    }

    async fn reset_credentials(
        &self,
        id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), DomainError> {
        // Credential swap and session purge must land together
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = ?,
                password_reset_token_hash = NULL,
                password_reset_expires_at = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_password_hash)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to reset credentials: {}", e),
        })?;

        sqlx::query("DELETE FROM account_refresh_tokens WHERE account_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to revoke sessions: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit credential reset: {}", e),
        })?;

        Ok(())
    }

    async fn push_refresh_token(&self, id: Uuid, token: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO account_refresh_tokens (account_id, token, created_at) VALUES (?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to store refresh token: {}", e),
        })?;

        Ok(())
    }

    async fn pull_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM account_refresh_tokens WHERE account_id = ? AND token = ?")
                .bind(id.to_string())
                .bind(token)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to remove refresh token: {}", e),
                })?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM account_refresh_tokens
                WHERE account_id = ? AND token = ?
            ) AS token_exists
            "#,
        )
        .bind(id.to_string())
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to check refresh token: {}", e),
        })?;

        let exists: i8 = row.try_get("token_exists").map_err(|e| DomainError::Internal {
            message: format!("Failed to get existence result: {}", e),
        })?;

        Ok(exists == 1)
    }

    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM account_refresh_tokens WHERE account_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to clear refresh tokens: {}", e),
            })?;

        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("UPDATE accounts SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to record login time: {}", e),
            })?;

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        // Sessions die with the account; the row itself only gets flagged
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET deleted = TRUE, deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to delete account: {}", e),
        })?;

        sqlx::query("DELETE FROM account_refresh_tokens WHERE account_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to revoke sessions: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit account deletion: {}", e),
        })?;

        Ok(result.rows_affected() > 0)
    }
}
