use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A server-side session credential. The token string is the only thing the client
/// ever holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SessionToken {
    #[serde(skip_serializing)]
    pub token: String,
    pub admin_id: i32,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionToken {
    /// Mints a fresh token for `admin_id`. The token is the simple (hyphenless) form
    /// of a v4 UUID, which draws its 122 random bits from the OS CSPRNG.
    pub fn new(admin_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            admin_id,
            created_at: now,
            last_active: now,
        }
    }

    /// Whether the token was last used before `active_since` (that is, `now - idle`).
    /// A token used exactly at the cutoff is still active.
    pub fn is_idle(&self, active_since: DateTime<Utc>) -> bool {
        self.last_active < active_since
    }
}
