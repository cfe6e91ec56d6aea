use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A member of the parish staff: clergy, choir director, sexton and so on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Servant {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a servant. Email and phone are unique across
/// servants.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ServantInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub surname: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub phone: String,
    #[validate(length(min = 1, max = 255))]
    pub role: String,
    pub birth_date: NaiveDate,
}
