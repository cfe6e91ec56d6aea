use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A named piece of content placed on a page. `identifier` is unique per page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentBlock {
    pub id: i32,
    pub page_id: i32,
    pub identifier: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ContentBlockInput {
    pub page_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Optional filter when listing content blocks.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentBlockQuery {
    pub page_id: Option<i32>,
}
