//! The session guard: issues, validates and revokes server-side session tokens.
//!
//! A token is `ACTIVE` while its last use lies within the idle window, becomes
//! `EXPIRED` once it has been idle for longer, and is `REVOKED` (deleted) after
//! logout, expiry discovery, the periodic purge, or deletion of its administrator.
//! Every successful validation moves `last_active` to the current time, so the
//! window slides with use.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::AppError;
use crate::models::{Admin, SessionToken};
use crate::store::{SessionRepository, TouchOutcome};

/// Why a token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardFailure {
    /// No token was presented.
    MissingCredential,
    /// The token does not exist (never issued, revoked, or already expired).
    UnknownToken,
    /// The token was idle for too long and has just been deleted.
    SessionExpired,
}

impl fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GuardFailure::MissingCredential => write!(f, "Missing authentication token"),
            GuardFailure::UnknownToken => write!(f, "Invalid authentication token"),
            GuardFailure::SessionExpired => write!(f, "Session expired"),
        }
    }
}

/// A missing credential is 401, a rejected one 403.
impl From<GuardFailure> for AppError {
    fn from(failure: GuardFailure) -> AppError {
        match failure {
            GuardFailure::MissingCredential => AppError::Unauthorized(failure.to_string()),
            GuardFailure::UnknownToken | GuardFailure::SessionExpired => {
                AppError::Forbidden(failure.to_string())
            }
        }
    }
}

/// Error from a guard operation: either a rejected token or a storage failure.
#[derive(Debug)]
pub enum GuardError {
    Rejected(GuardFailure),
    Store(AppError),
}

impl From<AppError> for GuardError {
    fn from(error: AppError) -> Self {
        GuardError::Store(error)
    }
}

impl From<GuardFailure> for GuardError {
    fn from(failure: GuardFailure) -> Self {
        GuardError::Rejected(failure)
    }
}

impl From<GuardError> for AppError {
    fn from(error: GuardError) -> AppError {
        match error {
            GuardError::Rejected(failure) => failure.into(),
            GuardError::Store(error) => error,
        }
    }
}

impl GuardError {
    /// The rejection reason, if this is not a storage failure.
    pub fn failure(&self) -> Option<GuardFailure> {
        match self {
            GuardError::Rejected(failure) => Some(*failure),
            GuardError::Store(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct SessionGuard {
    repo: Arc<dyn SessionRepository>,
    idle_timeout: Duration,
}

impl SessionGuard {
    pub fn new(repo: Arc<dyn SessionRepository>, idle_timeout: Duration) -> Self {
        Self { repo, idle_timeout }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Mints and stores a new token for `admin`.
    pub async fn issue(&self, admin: &Admin) -> Result<String, GuardError> {
        self.issue_at(admin, Utc::now()).await
    }

    pub async fn issue_at(&self, admin: &Admin, now: DateTime<Utc>) -> Result<String, GuardError> {
        let session = SessionToken::new(admin.id, now);
        self.repo.insert(&session).await?;
        log::debug!("Issued session for administrator {}", admin.id);
        Ok(session.token)
    }

    /// Resolves a token to its administrator and slides its idle window forward.
    pub async fn validate(&self, token: Option<&str>) -> Result<Admin, GuardError> {
        self.validate_at(token, Utc::now()).await
    }

    pub async fn validate_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Admin, GuardError> {
        let token = present(token)?;
        match self.repo.touch(token, now, now - self.idle_timeout).await? {
            TouchOutcome::Refreshed(admin) => Ok(admin),
            TouchOutcome::Expired => {
                log::info!("Session expired after {} idle", self.idle_timeout);
                Err(GuardFailure::SessionExpired.into())
            }
            TouchOutcome::Missing => Err(GuardFailure::UnknownToken.into()),
        }
    }

    /// Deletes a token. Revoking a token that does not exist is reported as
    /// `UnknownToken`.
    pub async fn revoke(&self, token: Option<&str>) -> Result<(), GuardError> {
        let token = present(token)?;
        if self.repo.delete(token).await? {
            log::debug!("Revoked session");
            Ok(())
        } else {
            Err(GuardFailure::UnknownToken.into())
        }
    }

    /// Deletes every token that has been idle past the timeout; returns how many.
    pub async fn purge_idle(&self) -> Result<u64, GuardError> {
        self.purge_idle_at(Utc::now()).await
    }

    pub async fn purge_idle_at(&self, now: DateTime<Utc>) -> Result<u64, GuardError> {
        let removed = self.repo.delete_idle(now - self.idle_timeout).await?;
        if removed > 0 {
            log::info!("Purged {} idle sessions", removed);
        }
        Ok(removed)
    }
}

fn present(token: Option<&str>) -> Result<&str, GuardFailure> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(GuardFailure::MissingCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AdminRepository, MemoryStore};
    use std::collections::HashSet;

    async fn setup() -> (MemoryStore, SessionGuard, Admin) {
        let store = MemoryStore::new();
        let admin = AdminRepository::insert(&store, "admin1", "hash").await.unwrap();
        let guard = SessionGuard::new(Arc::new(store.clone()), Duration::minutes(60));
        (store, guard, admin)
    }

    fn rejected(result: Result<Admin, GuardError>) -> GuardFailure {
        match result {
            Err(GuardError::Rejected(failure)) => failure,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_validate_after_issue_returns_admin() {
        let (_, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();

        let resolved = guard.validate(Some(&token)).await.unwrap();
        assert_eq!(resolved, admin);
    }

    #[actix_rt::test]
    async fn test_issued_tokens_are_unique() {
        let (_, guard, admin) = setup().await;
        let mut seen = HashSet::new();
        for _ in 0..200 {
            assert!(seen.insert(guard.issue(&admin).await.unwrap()));
        }
    }

    #[actix_rt::test]
    async fn test_missing_and_unknown_tokens() {
        let (_, guard, _) = setup().await;

        assert_eq!(rejected(guard.validate(None).await), GuardFailure::MissingCredential);
        assert_eq!(rejected(guard.validate(Some("  ")).await), GuardFailure::MissingCredential);
        assert_eq!(
            rejected(guard.validate(Some("deadbeef")).await),
            GuardFailure::UnknownToken
        );
    }

    #[actix_rt::test]
    async fn test_idle_token_expires_then_is_unknown() {
        let (store, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();
        let now = Utc::now();
        assert!(store.set_last_active(&token, now - Duration::minutes(61)).await);

        assert_eq!(
            rejected(guard.validate_at(Some(&token), now).await),
            GuardFailure::SessionExpired
        );
        assert_eq!(
            rejected(guard.validate_at(Some(&token), now).await),
            GuardFailure::UnknownToken
        );
    }

    #[actix_rt::test]
    async fn test_validation_refreshes_last_active() {
        let (store, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();
        let now = Utc::now();
        store.set_last_active(&token, now - Duration::minutes(30)).await;

        guard.validate_at(Some(&token), now).await.unwrap();

        let session = store.session(&token).await.unwrap();
        assert_eq!(session.last_active, now);
    }

    #[actix_rt::test]
    async fn test_sliding_window_keeps_session_alive() {
        let (_, guard, admin) = setup().await;
        let start = Utc::now();
        let token = guard.issue_at(&admin, start).await.unwrap();

        // A full day of use at 59-minute intervals, far beyond one idle window.
        for step in 1..=24 {
            let at = start + Duration::minutes(59 * step);
            assert_eq!(guard.validate_at(Some(&token), at).await.unwrap(), admin);
        }
    }

    #[actix_rt::test]
    async fn test_revoke_then_validate_fails() {
        let (_, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();

        guard.revoke(Some(&token)).await.unwrap();

        assert_eq!(
            rejected(guard.validate(Some(&token)).await),
            GuardFailure::UnknownToken
        );
    }

    #[actix_rt::test]
    async fn test_revoke_unknown_token_is_reported() {
        let (_, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();
        guard.revoke(Some(&token)).await.unwrap();

        match guard.revoke(Some(&token)).await {
            Err(GuardError::Rejected(GuardFailure::UnknownToken)) => {}
            other => panic!("expected UnknownToken, got {:?}", other),
        }
        assert!(matches!(
            guard.revoke(None).await,
            Err(GuardError::Rejected(GuardFailure::MissingCredential))
        ));
    }

    #[actix_rt::test]
    async fn test_sessions_are_independent() {
        let (_, guard, admin) = setup().await;
        let first = guard.issue(&admin).await.unwrap();
        let second = guard.issue(&admin).await.unwrap();

        guard.revoke(Some(&first)).await.unwrap();

        assert!(guard.validate(Some(&second)).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_deleting_admin_invalidates_tokens() {
        let (store, guard, admin) = setup().await;
        let token = guard.issue(&admin).await.unwrap();

        AdminRepository::delete(&store, admin.id).await.unwrap();

        assert_eq!(
            rejected(guard.validate(Some(&token)).await),
            GuardFailure::UnknownToken
        );
    }

    #[actix_rt::test]
    async fn test_purge_idle() {
        let (store, guard, admin) = setup().await;
        let now = Utc::now();
        let idle = guard.issue_at(&admin, now - Duration::minutes(90)).await.unwrap();
        let active = guard.issue_at(&admin, now - Duration::minutes(10)).await.unwrap();

        assert_eq!(guard.purge_idle_at(now).await.unwrap(), 1);
        assert!(store.session(&idle).await.is_none());
        assert!(store.session(&active).await.is_some());
    }

    #[test]
    fn test_guard_failure_status_codes() {
        use actix_web::ResponseError;

        let missing: AppError = GuardFailure::MissingCredential.into();
        let unknown: AppError = GuardFailure::UnknownToken.into();
        let expired: AppError = GuardFailure::SessionExpired.into();

        assert_eq!(missing.status_code(), 401);
        assert_eq!(unknown.status_code(), 403);
        assert_eq!(expired.status_code(), 403);
    }
}
