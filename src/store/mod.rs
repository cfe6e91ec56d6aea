//! Persistence seams for the authentication core.
//!
//! The credential store and the session guard only talk to storage through the two
//! traits below. [`PgStore`] backs them with PostgreSQL in production; [`MemoryStore`]
//! keeps everything in process for tests and local experiments. Both types
//! implement both traits, so one value can serve as admin and session storage, and
//! deleting an administrator takes its session tokens with it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Admin, AdminCredentials, SessionToken};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage for administrator accounts.
#[async_trait]
pub trait AdminRepository: Send + Sync + 'static {
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminCredentials>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Admin>, AppError>;

    async fn list(&self) -> Result<Vec<Admin>, AppError>;

    /// Inserts a new administrator. Fails with [`AppError::Conflict`] when the login
    /// is already taken.
    async fn insert(&self, login: &str, password_hash: &str) -> Result<Admin, AppError>;

    /// Applies the given changes. Returns `None` when no administrator has `id`, and
    /// [`AppError::Conflict`] when the new login is taken by someone else.
    async fn update(
        &self,
        id: i32,
        login: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<Admin>, AppError>;

    /// Deletes the administrator and every session token it owns. Returns `false`
    /// when no administrator has `id`.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// What happened to a token presented for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchOutcome {
    /// The token was active; `last_active` now equals the supplied `now`.
    Refreshed(Admin),
    /// The token had been idle since before the cutoff and has been deleted.
    Expired,
    /// No such token.
    Missing,
}

/// Storage for session tokens.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    async fn insert(&self, session: &SessionToken) -> Result<(), AppError>;

    /// Atomically classifies and updates one token. A token whose `last_active` is
    /// earlier than `active_since` is deleted and reported as
    /// [`TouchOutcome::Expired`]; otherwise its `last_active` becomes `now`.
    ///
    /// No other writer may observe or modify the row between the check and the write.
    async fn touch(
        &self,
        token: &str,
        now: DateTime<Utc>,
        active_since: DateTime<Utc>,
    ) -> Result<TouchOutcome, AppError>;

    /// Deletes the token. Returns `false` when it did not exist.
    async fn delete(&self, token: &str) -> Result<bool, AppError>;

    /// Deletes every token idle since before `active_since`; returns how many.
    async fn delete_idle(&self, active_since: DateTime<Utc>) -> Result<u64, AppError>;
}
