use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Uploaded file attached to a course.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseResource {
    pub id: i64,
    pub course_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub created_at: OffsetDateTime,
}

pub async fn insert(
    db: &PgPool,
    course_id: i64,
    file_name: &str,
    content_type: &str,
    size_bytes: i64,
    storage_key: &str,
) -> anyhow::Result<CourseResource> {
    let resource = sqlx::query_as::<_, CourseResource>(
        r#"
        INSERT INTO course_resources (course_id, file_name, content_type, size_bytes, storage_key)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, course_id, file_name, content_type, size_bytes, storage_key, created_at
        "#,
    )
    .bind(course_id)
    .bind(file_name)
    .bind(content_type)
    .bind(size_bytes)
    .bind(storage_key)
    .fetch_one(db)
    .await
    .context("insert course resource")?;
    Ok(resource)
}

pub async fn list_by_course(db: &PgPool, course_id: i64) -> anyhow::Result<Vec<CourseResource>> {
    let rows = sqlx::query_as::<_, CourseResource>(
        r#"
        SELECT id, course_id, file_name, content_type, size_bytes, storage_key, created_at
        FROM course_resources
        WHERE course_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
    .context("list course resources")?;
    Ok(rows)
}
