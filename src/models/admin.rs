use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::LOGIN_REGEX;

/// An administrator account as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: i32,
    pub login: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An administrator row together with its bcrypt hash. Only the credential store
/// sees this type.
#[derive(Debug, Clone, FromRow)]
pub struct AdminCredentials {
    pub id: i32,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminCredentials {
    pub fn to_admin(&self) -> Admin {
        Admin {
            id: self.id,
            login: self.login.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Payload for creating an administrator.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminInput {
    /// 1 to 50 characters: letters, digits, `.`, `_` or `-`.
    #[validate(
        length(min = 1, max = 50),
        regex(
            path = "LOGIN_REGEX",
            message = "Login may contain letters, digits, '.', '_' or '-'"
        )
    )]
    pub login: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Payload for changing an administrator's login and/or password.
/// Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AdminUpdate {
    #[validate(
        length(min = 1, max = 50),
        regex(
            path = "LOGIN_REGEX",
            message = "Login may contain letters, digits, '.', '_' or '-'"
        )
    )]
    pub login: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}
