use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Course record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub image: Option<String>,
    pub rating: f64,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub created_at: OffsetDateTime,
    pub view_count: i64,
    pub enrollment_count: i64,
    pub popularity_score: i64,
}
