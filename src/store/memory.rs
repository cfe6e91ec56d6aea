//! In-process implementation of the admin and session repositories.
//!
//! All state sits behind one mutex, so every trait method is a single critical
//! section. That gives `touch` the same atomicity the PostgreSQL implementation gets
//! from row locks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{AdminRepository, SessionRepository, TouchOutcome};
use crate::error::AppError;
use crate::models::{Admin, AdminCredentials, SessionToken};

#[derive(Debug, Default)]
struct State {
    next_admin_id: i32,
    admins: HashMap<i32, AdminCredentials>,
    sessions: HashMap<String, SessionToken>,
}

/// Admin and session storage held in memory. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored token, if any.
    pub async fn session(&self, token: &str) -> Option<SessionToken> {
        self.state.lock().await.sessions.get(token).cloned()
    }

    /// Overwrites `last_active` of a stored token. Returns `false` when the token does
    /// not exist. Used to simulate idle time.
    pub async fn set_last_active(&self, token: &str, at: DateTime<Utc>) -> bool {
        match self.state.lock().await.sessions.get_mut(token) {
            Some(session) => {
                session.last_active = at;
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminCredentials>, AppError> {
        let state = self.state.lock().await;
        Ok(state.admins.values().find(|a| a.login == login).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Admin>, AppError> {
        let state = self.state.lock().await;
        Ok(state.admins.get(&id).map(AdminCredentials::to_admin))
    }

    async fn list(&self) -> Result<Vec<Admin>, AppError> {
        let state = self.state.lock().await;
        let mut admins: Vec<Admin> = state
            .admins
            .values()
            .map(AdminCredentials::to_admin)
            .collect();
        admins.sort_by_key(|a| a.id);
        Ok(admins)
    }

    async fn insert(&self, login: &str, password_hash: &str) -> Result<Admin, AppError> {
        let mut state = self.state.lock().await;
        if state.admins.values().any(|a| a.login == login) {
            return Err(AppError::Conflict(format!("Login '{}' is already taken", login)));
        }

        state.next_admin_id += 1;
        let now = Utc::now();
        let record = AdminCredentials {
            id: state.next_admin_id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let admin = record.to_admin();
        state.admins.insert(record.id, record);
        Ok(admin)
    }

    async fn update(
        &self,
        id: i32,
        login: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<Admin>, AppError> {
        let mut state = self.state.lock().await;
        if let Some(login) = login {
            if state.admins.values().any(|a| a.login == login && a.id != id) {
                return Err(AppError::Conflict(format!("Login '{}' is already taken", login)));
            }
        }

        let Some(record) = state.admins.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(login) = login {
            record.login = login.to_string();
        }
        if let Some(hash) = password_hash {
            record.password_hash = hash.to_string();
        }
        record.updated_at = Utc::now();
        Ok(Some(record.to_admin()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        if state.admins.remove(&id).is_none() {
            return Ok(false);
        }
        state.sessions.retain(|_, s| s.admin_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn insert(&self, session: &SessionToken) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        if !state.admins.contains_key(&session.admin_id) {
            return Err(AppError::BadRequest("Referenced record does not exist".into()));
        }
        if state.sessions.contains_key(&session.token) {
            return Err(AppError::Conflict("Session token already exists".into()));
        }
        state.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn touch(
        &self,
        token: &str,
        now: DateTime<Utc>,
        active_since: DateTime<Utc>,
    ) -> Result<TouchOutcome, AppError> {
        let mut state = self.state.lock().await;
        let Some(session) = state.sessions.get_mut(token) else {
            return Ok(TouchOutcome::Missing);
        };

        if session.is_idle(active_since) {
            state.sessions.remove(token);
            return Ok(TouchOutcome::Expired);
        }

        session.last_active = now;
        let admin_id = session.admin_id;
        match state.admins.get(&admin_id) {
            Some(record) => Ok(TouchOutcome::Refreshed(record.to_admin())),
            None => {
                // Orphaned token; treat it as gone.
                state.sessions.remove(token);
                Ok(TouchOutcome::Missing)
            }
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.state.lock().await.sessions.remove(token).is_some())
    }

    async fn delete_idle(&self, active_since: DateTime<Utc>) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_idle(active_since));
        Ok((before - state.sessions.len()) as u64)
    }
}
