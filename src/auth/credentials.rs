use std::sync::Arc;

use actix_web::web;
use tokio::sync::OnceCell;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Admin, AdminInput, AdminUpdate};
use crate::store::AdminRepository;

/// Message for every rejected login, whether the login or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Hashed once per store and checked against when the login is unknown, so those
/// attempts cost as much bcrypt work as a wrong password.
const DUMMY_PASSWORD: &str = "keystone-unknown-login";

/// Administrator identities and their password hashes.
///
/// Hashing and verification run on actix's blocking pool; bcrypt is deliberately
/// slow and would otherwise stall the worker.
#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn AdminRepository>,
    hash_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn AdminRepository>, hash_cost: u32) -> Self {
        Self {
            repo,
            hash_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Checks a login attempt. Unknown logins and wrong passwords produce the same
    /// `Unauthorized` error.
    pub async fn verify(&self, login: &str, password: &str) -> Result<Admin, AppError> {
        let Some(record) = self.repo.find_by_login(login).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
                .await?;
            self.check(password, dummy).await?;
            log::info!("Rejected login attempt for unknown login '{}'", login);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        if self.check(password, &record.password_hash).await? {
            log::info!("Administrator '{}' (id {}) logged in", record.login, record.id);
            Ok(record.to_admin())
        } else {
            log::info!("Rejected login attempt for '{}': wrong password", login);
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()))
        }
    }

    /// Creates an administrator. Fails with `Conflict` if the login already exists.
    pub async fn create(&self, input: &AdminInput) -> Result<Admin, AppError> {
        input.validate()?;
        let hash = self.hash(&input.password).await?;
        let admin = self.repo.insert(&input.login, &hash).await?;
        log::info!("Created administrator '{}' (id {})", admin.login, admin.id);
        Ok(admin)
    }

    /// Changes login and/or password. A new password is re-hashed before storage.
    pub async fn update(&self, id: i32, changes: &AdminUpdate) -> Result<Admin, AppError> {
        changes.validate()?;
        let hash = match &changes.password {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };

        self.repo
            .update(id, changes.login.as_deref(), hash.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".into()))
    }

    /// Deletes an administrator together with all of its sessions.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            log::info!("Deleted administrator {} and its sessions", id);
            Ok(())
        } else {
            Err(AppError::NotFound("Admin not found".into()))
        }
    }

    pub async fn get(&self, id: i32) -> Result<Admin, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".into()))
    }

    pub async fn list(&self) -> Result<Vec<Admin>, AppError> {
        self.repo.list().await
    }

    pub async fn exists(&self, login: &str) -> Result<bool, AppError> {
        Ok(self.repo.find_by_login(login).await?.is_some())
    }

    async fn check(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        web::block(move || verify_password(&password, &password_hash)).await?
    }

    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.hash_cost;
        web::block(move || hash_password(&password, cost)).await?
    }
}
