use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::ActivityLogEntry;

/// Append one entry. The log is insert-only; nothing in the codebase updates
/// or deletes rows in `activity_log`.
pub async fn append(
    db: &PgPool,
    user_id: Option<i64>,
    action: &str,
    details: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO activity_log (user_id, action, details)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(details)
    .execute(db)
    .await
    .context("append activity log entry")?;
    Ok(())
}

/// Newest-first page of the log.
pub async fn list_recent(
    db: &PgPool,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ActivityLogEntry>> {
    let rows = sqlx::query_as::<_, ActivityLogEntry>(
        r#"
        SELECT id, user_id, action, details, created_at
        FROM activity_log
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list activity log")?;
    Ok(rows)
}
