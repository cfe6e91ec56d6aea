use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A scheduled divine service (liturgy, vespers, a baptism...), led by a servant and
/// requested by or held for a parishioner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub servant_id: i32,
    pub parishioner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ServiceInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub servant_id: i32,
    pub parishioner_id: i32,
}
