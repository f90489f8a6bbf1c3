use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Append-only audit record. `user_id` has no foreign key so entries outlive
/// the user they reference.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub details: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
