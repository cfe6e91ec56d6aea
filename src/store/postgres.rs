//! PostgreSQL implementation of the admin and session repositories.
//!
//! Token validation runs inside a transaction that locks the token row with
//! `SELECT ... FOR UPDATE`, so a refresh and an expiry of the same token can never
//! interleave. Deleting an administrator relies on the `ON DELETE CASCADE` foreign
//! key on `session_tokens.admin_id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{AdminRepository, SessionRepository, TouchOutcome};
use crate::error::AppError;
use crate::models::{Admin, AdminCredentials, SessionToken};

const ADMIN_COLUMNS: &str = "id, login, created_at, updated_at";

/// Repositories over a shared connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn login_conflict(error: sqlx::Error, login: &str) -> AppError {
    match AppError::from(error) {
        AppError::Conflict(_) => AppError::Conflict(format!("Login '{}' is already taken", login)),
        other => other,
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminCredentials>, AppError> {
        let admin = sqlx::query_as::<_, AdminCredentials>(
            "SELECT id, login, password_hash, created_at, updated_at FROM admins WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE id = $1",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn list(&self) -> Result<Vec<Admin>, AppError> {
        let admins = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins ORDER BY id",
            ADMIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    async fn insert(&self, login: &str, password_hash: &str) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (login, password_hash) VALUES ($1, $2) RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| login_conflict(e, login))
    }

    async fn update(
        &self,
        id: i32,
        login: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins
             SET login = COALESCE($2, login),
                 password_hash = COALESCE($3, password_hash),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .bind(login)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| login_conflict(e, login.unwrap_or_default()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn insert(&self, session: &SessionToken) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO session_tokens (token, admin_id, created_at, last_active)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token)
        .bind(session.admin_id)
        .bind(session.created_at)
        .bind(session.last_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn touch(
        &self,
        token: &str,
        now: DateTime<Utc>,
        active_since: DateTime<Utc>,
    ) -> Result<TouchOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let last_active = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT last_active FROM session_tokens WHERE token = $1 FOR UPDATE",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match last_active {
            None => TouchOutcome::Missing,
            Some(last_active) if last_active < active_since => {
                sqlx::query("DELETE FROM session_tokens WHERE token = $1")
                    .bind(token)
                    .execute(&mut *tx)
                    .await?;
                TouchOutcome::Expired
            }
            Some(_) => {
                let admin = sqlx::query_as::<_, Admin>(
                    "UPDATE session_tokens s
                     SET last_active = $2
                     FROM admins a
                     WHERE s.token = $1 AND a.id = s.admin_id
                     RETURNING a.id, a.login, a.created_at, a.updated_at",
                )
                .bind(token)
                .bind(now)
                .fetch_optional(&mut *tx)
                .await?;
                admin.map_or(TouchOutcome::Missing, TouchOutcome::Refreshed)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn delete(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_idle(&self, active_since: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE last_active < $1")
            .bind(active_since)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
