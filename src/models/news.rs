use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::SLUG_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct News {
    pub id: i32,
    pub identifier: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewsInput {
    /// Public, unique handle used in news URLs.
    #[validate(
        length(min = 1, max = 255),
        regex(
            path = "SLUG_REGEX",
            message = "Identifier must be lowercase words joined by '-'"
        )
    )]
    pub identifier: String,
    #[validate(length(min = 1, max = 320))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}
