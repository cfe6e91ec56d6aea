use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A prayer request sent in by a visitor of the site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Need {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub email: String,
    pub phone: Option<String>,
    pub name: String,
    pub surname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NeedInput {
    #[validate(length(min = 1, max = 400))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(email, length(max = 60))]
    pub email: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub surname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_input_validation() {
        let valid = NeedInput {
            title: "For the health of Maria".to_string(),
            content: "Please pray for my mother".to_string(),
            email: "anna@example.com".to_string(),
            phone: None,
            name: "Anna".to_string(),
            surname: "Ivanova".to_string(),
        };
        assert!(valid.validate().is_ok());

        let long_phone = NeedInput {
            phone: Some("1".repeat(16)),
            ..valid
        };
        assert!(long_phone.validate().is_err());
    }
}
