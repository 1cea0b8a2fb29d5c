use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserChanges, UserSort, UserStoreError};
use crate::db::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by (normalized) email.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// All users, sorted by `ordering` in priority order.
    async fn list_users(&self, ordering: &[UserSort]) -> anyhow::Result<Vec<User>>;
    /// Fails with `EmailTaken` when the email is already in use.
    async fn create_user(&self, new: NewUser) -> Result<User, UserStoreError>;
    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, UserStoreError>;
    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> anyhow::Result<()>;
    /// Delete a user and everything it owns. Returns false if it did not exist.
    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool>;
}

const USER_COLUMNS: &str =
    "id, email, name, password_hash, is_active, is_staff, is_superuser, last_login, created_at";

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("find user by id")?;
        Ok(user)
    }

    async fn list_users(&self, ordering: &[UserSort]) -> anyhow::Result<Vec<User>> {
        let mut sql = format!("SELECT {USER_COLUMNS} FROM users");
        if !ordering.is_empty() {
            let keys: Vec<String> = ordering
                .iter()
                .map(|k| {
                    let dir = if k.descending { "DESC" } else { "ASC" };
                    format!("{} {dir}", k.column.sql())
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }
        let rows = sqlx::query_as::<_, User>(&sql)
        .fetch_all(&self.pool)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, UserStoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .bind(new.is_staff)
        .bind(new.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "insert user"))?;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email         = COALESCE($2, email),
                   name          = COALESCE($3, name),
                   password_hash = COALESCE($4, password_hash),
                   is_active     = COALESCE($5, is_active),
                   is_staff      = COALESCE($6, is_staff),
                   is_superuser  = COALESCE($7, is_superuser)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.password_hash)
        .bind(changes.is_active)
        .bind(changes.is_staff)
        .bind(changes.is_superuser)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "update user"))?;
        Ok(user)
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .context("record last login")?;
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }
}

/// The only unique column on `users` is `email`.
fn write_error(err: sqlx::Error, what: &'static str) -> UserStoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return UserStoreError::EmailTaken;
        }
    }
    UserStoreError::Other(anyhow::Error::new(err).context(what))
}
