use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{ContentBlock, SLUG_REGEX};

/// A page of the public site, addressed by its slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Page {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PageInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Lowercase words joined by hyphens, e.g. `about-us`.
    #[validate(
        length(min = 1, max = 255),
        regex(path = "SLUG_REGEX", message = "Slug must be lowercase words joined by '-'")
    )]
    pub slug: String,
}

/// A page with every content block that belongs to it, for rendering a whole page in
/// one request.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageWithBlocks {
    #[serde(flatten)]
    pub page: Page,
    pub blocks: Vec<ContentBlock>,
}
