//! Identity store over SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

use plaza_core::{Email, UserId, UserRole, Username};

use super::RelationalStore;
use crate::models::{NewUser, User};
use crate::store::{IdentityStore, StoreError};

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let username: String = row.try_get("username")?;
    let username = Username::parse(&username)
        .map_err(|e| StoreError::DataCorruption(format!("invalid username in database: {e}")))?;

    let email: String = row.try_get("email")?;
    let email = Email::parse(&email)
        .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;

    let role: String = row.try_get("role")?;
    let role: UserRole = role
        .parse()
        .map_err(|e| StoreError::DataCorruption(format!("invalid role in database: {e}")))?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        username,
        email,
        role,
        verified: row.try_get("verified")?,
        created_at,
    })
}

const USER_COLUMNS: &str = "id, username, email, role, verified, created_at";

#[async_trait]
impl IdentityStore for RelationalStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Explicit pre-checks give field-specific duplicate messages;
        // the UNIQUE constraints remain the backstop.
        let username_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
                .bind(new.username.as_str())
                .fetch_one(&mut *tx)
                .await?;
        if username_taken > 0 {
            return Err(StoreError::Conflict("Username already taken.".to_owned()));
        }

        let email_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
                .bind(new.email.as_str())
                .fetch_one(&mut *tx)
                .await?;
        if email_taken > 0 {
            return Err(StoreError::Conflict("Email already registered.".to_owned()));
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role, verified, created_at)
             VALUES (?, ?, ?, ?, 0, ?)",
        )
        .bind(new.username.as_str())
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(new.role.to_string())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict("Username or email already in use.".to_owned());
            }
            StoreError::Database(e)
        })?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        Ok(User {
            id: UserId::new(id),
            username: new.username,
            email: new.email,
            role: new.role,
            verified: false,
            created_at,
        })
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn password_hash_for(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = user_from_row(&row)?;
        let hash: String = row.try_get("password_hash")?;
        Ok(Some((user, hash)))
    }

    async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.to_string())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET verified = ? WHERE id = ?")
            .bind(verified)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
